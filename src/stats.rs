//! Statistical kernel shared by every view.

use crate::error::{DashboardError, Result};

/// Arithmetic mean. NaN for an empty slice; NaN members propagate.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation with population moments. The `n` in covariance and
/// both variances cancels, so the sums are used directly; this keeps
/// `pearson(x, x)` exactly 1.
///
/// A constant input has zero variance and yields a non-finite coefficient;
/// callers receive it as-is.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(DashboardError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let x_mean = mean(x);
    let y_mean = mean(y);

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    let mut y_variance = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        covariance += dx * dy;
        x_variance += dx * dx;
        y_variance += dy * dy;
    }

    Ok(covariance / (x_variance * y_variance).sqrt())
}

/// Exponentiates and normalizes so the result sums to one. The maximum is
/// subtracted first to keep large inputs finite.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn mean_of_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn perfectly_linear_series_correlate() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);

        let inverted = [8.0, 6.0, 4.0, 2.0];
        assert_relative_eq!(pearson(&x, &inverted).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn known_coefficient() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        assert_relative_eq!(pearson(&x, &y).unwrap(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn self_correlation_is_exactly_one() {
        let x = [10.5, 19.1, 7.2, 15.8, 3.9, 12.5, 0.6000000000000001];
        assert_eq!(pearson(&x, &x).unwrap(), 1.0);
    }

    #[test]
    fn constant_series_is_not_finite() {
        let x = [3.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        assert!(!pearson(&x, &y).unwrap().is_finite());
    }

    #[test]
    fn nan_member_propagates() {
        let x = [1.0, f64::NAN, 3.0];
        let y = [1.0, 2.0, 3.0];
        assert!(pearson(&x, &y).unwrap().is_nan());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = pearson(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::LengthMismatch { left: 2, right: 1 }
        ));
    }

    #[test]
    fn softmax_of_equal_values_is_uniform() {
        let shares = softmax(&[0.0, 0.0, 0.0, 0.0]);
        for share in shares {
            assert_relative_eq!(share, 0.25);
        }
    }

    #[test]
    fn softmax_survives_large_inputs() {
        let shares = softmax(&[1000.0, 1000.0]);
        assert_relative_eq!(shares[0], 0.5);
        assert_relative_eq!(shares[1], 0.5);
    }

    #[test]
    fn softmax_of_empty_is_empty() {
        assert!(softmax(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn pearson_is_symmetric(pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..40)) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let xy = pearson(&x, &y).unwrap();
            let yx = pearson(&y, &x).unwrap();
            prop_assert!(xy == yx || (xy.is_nan() && yx.is_nan()));
        }

        #[test]
        fn pearson_self_is_one(x in prop::collection::vec(-100.0f64..100.0, 2..40)) {
            prop_assume!(x.iter().any(|v| (v - x[0]).abs() > 1e-6));
            prop_assert_eq!(pearson(&x, &x).unwrap(), 1.0);
        }

        #[test]
        fn softmax_is_a_distribution(v in prop::collection::vec(-20.0f64..20.0, 1..16)) {
            let shares = softmax(&v);
            let total: f64 = shares.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            for share in shares {
                prop_assert!((share > 0.0 && share < 1.0) || (v.len() == 1 && share == 1.0));
            }
        }
    }
}
