//! Chart-ready aggregates computed from the active subset.
//!
//! Group keys always come from the full record set so every view keeps a
//! stable set of groups while filters change; a group with no active records
//! reports a mean of zero instead of disappearing.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Record, SchoolType};
use crate::schema::{Metric, Resource};
use crate::stats;

/// Categorical field a view groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Zone,
    SchoolType,
    Gender,
}

impl GroupKey {
    pub fn label(self, record: &Record) -> &str {
        match self {
            GroupKey::Zone => &record.zone,
            GroupKey::SchoolType => record.school_type.label(),
            GroupKey::Gender => &record.gender,
        }
    }
}

/// Distinct categorical values of the full record set, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Domains {
    pub zones: Vec<String>,
    pub school_types: Vec<String>,
    pub genders: Vec<String>,
}

impl Domains {
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            zones: distinct(records, GroupKey::Zone),
            school_types: distinct(records, GroupKey::SchoolType),
            genders: distinct(records, GroupKey::Gender),
        }
    }
}

pub fn distinct(records: &[Record], key: GroupKey) -> Vec<String> {
    let values: IndexSet<&str> = records.iter().map(|record| key.label(record)).collect();
    values.into_iter().map(str::to_string).collect()
}

/// Mean that treats an empty group as zero. NaN members still propagate.
pub fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        stats::mean(values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeans {
    pub group: String,
    pub means: IndexMap<Metric, f64>,
}

/// Per-group mean of each metric over `active`, one entry per `groups` label.
pub fn group_means(
    active: &[&Record],
    key: GroupKey,
    groups: &[String],
    metrics: &[Metric],
) -> Vec<GroupMeans> {
    let mut buckets: IndexMap<&str, Vec<&Record>> = groups
        .iter()
        .map(|group| (group.as_str(), Vec::new()))
        .collect();
    for &record in active {
        if let Some(bucket) = buckets.get_mut(key.label(record)) {
            bucket.push(record);
        }
    }

    buckets
        .into_iter()
        .map(|(group, members)| {
            let means = metrics
                .iter()
                .map(|&metric| {
                    let values: Vec<f64> = members.iter().map(|r| r.score(metric)).collect();
                    (metric, mean_or_zero(&values))
                })
                .collect();
            GroupMeans {
                group: group.to_string(),
                means,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub metrics: Vec<Metric>,
    /// Row-major; `values[i][j]` correlates `metrics[i]` with `metrics[j]`.
    pub values: Vec<Vec<f64>>,
}

pub fn correlation_matrix(active: &[&Record], metrics: &[Metric]) -> Result<CorrelationMatrix> {
    let columns: Vec<Vec<f64>> = metrics
        .iter()
        .map(|&metric| active.iter().map(|r| r.score(metric)).collect())
        .collect();

    let mut values = Vec::with_capacity(metrics.len());
    for x in &columns {
        let mut row = Vec::with_capacity(metrics.len());
        for y in &columns {
            row.push(stats::pearson(x, y)?);
        }
        values.push(row);
    }

    Ok(CorrelationMatrix {
        metrics: metrics.to_vec(),
        values,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceShares {
    pub zone: String,
    /// Presence rate of each resource within the zone.
    pub rates: IndexMap<Resource, f64>,
    /// Softmax of `rates`; sums to one per zone.
    pub shares: IndexMap<Resource, f64>,
}

/// Presence rate per resource and zone, turned into relative shares with
/// softmax.
pub fn resource_shares(active: &[&Record], zones: &[String]) -> Vec<ResourceShares> {
    zones
        .iter()
        .map(|zone| {
            let members: Vec<&Record> = active
                .iter()
                .copied()
                .filter(|record| &record.zone == zone)
                .collect();
            let rates: Vec<f64> = Resource::ALL
                .iter()
                .map(|&resource| {
                    let indicators: Vec<f64> = members
                        .iter()
                        .map(|r| if r.has(resource) { 1.0 } else { 0.0 })
                        .collect();
                    mean_or_zero(&indicators)
                })
                .collect();
            let shares = stats::softmax(&rates);

            ResourceShares {
                zone: zone.clone(),
                rates: Resource::ALL.into_iter().zip(rates).collect(),
                shares: Resource::ALL.into_iter().zip(shares).collect(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: usize,
}

/// School types on one side, zones on the other; links index into `nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<String>,
    pub links: Vec<FlowLink>,
}

pub fn flow_graph(active: &[&Record], school_types: &[String], zones: &[String]) -> FlowGraph {
    let mut counts: IndexMap<(&str, &str), usize> = IndexMap::new();
    for record in active {
        *counts
            .entry((record.school_type.label(), record.zone.as_str()))
            .or_insert(0) += 1;
    }

    let nodes: Vec<String> = school_types.iter().chain(zones).cloned().collect();
    let mut links = Vec::new();
    for (source, school_type) in school_types.iter().enumerate() {
        for (offset, zone) in zones.iter().enumerate() {
            let value = counts
                .get(&(school_type.as_str(), zone.as_str()))
                .copied()
                .unwrap_or(0);
            if value > 0 {
                links.push(FlowLink {
                    source,
                    target: school_types.len() + offset,
                    value,
                });
            }
        }
    }

    FlowGraph { nodes, links }
}

/// Everything the six dashboard charts draw, for one active subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub school_type: Vec<GroupMeans>,
    pub zone: Vec<GroupMeans>,
    pub correlation: CorrelationMatrix,
    pub resources: Vec<ResourceShares>,
    pub radar: Vec<GroupMeans>,
    pub flow: FlowGraph,
}

/// Categories the radar chart always compares, regardless of the data.
pub fn radar_categories() -> Vec<String> {
    vec![
        SchoolType::Public.label().to_string(),
        SchoolType::Private.label().to_string(),
    ]
}

pub fn compute_view(active: &[&Record], domains: &Domains) -> Result<DashboardView> {
    Ok(DashboardView {
        school_type: group_means(
            active,
            GroupKey::SchoolType,
            &domains.school_types,
            &Metric::SCORE_TYPES,
        ),
        zone: group_means(active, GroupKey::Zone, &domains.zones, &Metric::SCORE_TYPES),
        correlation: correlation_matrix(active, &Metric::ALL)?,
        resources: resource_shares(active, &domains.zones),
        radar: group_means(
            active,
            GroupKey::SchoolType,
            &radar_categories(),
            &Metric::ALL,
        ),
        flow: flow_graph(active, &domains.school_types, &domains.zones),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(zone: &str, school_type: &str, scores: [f64; 6], resources: [bool; 4]) -> Record {
        Record {
            zone: zone.to_string(),
            school_type: SchoolType::from_label(school_type),
            gender: "F".to_string(),
            scores,
            resources,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("A", "Public", [6.0, 5.0, 4.0, 3.0, 2.0, 1.0], [true, true, false, false]),
            record("A", "Privé", [8.0, 7.0, 9.0, 6.0, 5.0, 4.0], [true, true, true, true]),
            record("B", "Public", [4.0, 6.0, 5.0, 7.0, 8.0, 2.0], [false, true, false, true]),
        ]
    }

    #[test]
    fn domains_keep_first_seen_order() {
        let domains = Domains::from_records(&sample());
        assert_eq!(domains.zones, vec!["A", "B"]);
        assert_eq!(domains.school_types, vec!["Public", "Privé"]);
        assert_eq!(domains.genders, vec!["F"]);
    }

    #[test]
    fn empty_group_means_are_zero() {
        let records = sample();
        let active: Vec<&Record> = records.iter().filter(|r| r.zone == "A").collect();
        let zones = vec!["A".to_string(), "B".to_string()];
        let means = group_means(&active, GroupKey::Zone, &zones, &Metric::ALL);
        assert_eq!(means.len(), 2);
        for value in means[1].means.values() {
            assert_eq!(*value, 0.0);
        }
        assert_relative_eq!(means[0].means[&Metric::Primary], 7.0);
    }

    #[test]
    fn nan_scores_propagate_into_means() {
        let mut records = sample();
        records[0].scores[0] = f64::NAN;
        let active: Vec<&Record> = records.iter().collect();
        let means = group_means(
            &active,
            GroupKey::SchoolType,
            &["Public".to_string()],
            &[Metric::Primary],
        );
        assert!(means[0].means[&Metric::Primary].is_nan());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let records = sample();
        let active: Vec<&Record> = records.iter().collect();
        let matrix = correlation_matrix(&active, &Metric::ALL).unwrap();
        for i in 0..Metric::ALL.len() {
            assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..Metric::ALL.len() {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
    }

    #[test]
    fn degenerate_correlation_is_kept() {
        let records = vec![
            record("A", "Public", [5.0, 1.0, 0.0, 0.0, 0.0, 0.0], [false; 4]),
            record("A", "Public", [5.0, 2.0, 0.0, 0.0, 0.0, 0.0], [false; 4]),
        ];
        let active: Vec<&Record> = records.iter().collect();
        let matrix = correlation_matrix(&active, &[Metric::Primary, Metric::Collegial]).unwrap();
        assert!(!matrix.values[0][1].is_finite());
        assert_eq!(matrix.values[1][1], 1.0);
    }

    #[test]
    fn resource_shares_sum_to_one_per_zone() {
        let records = sample();
        let active: Vec<&Record> = records.iter().collect();
        let zones = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let shares = resource_shares(&active, &zones);

        assert_eq!(shares[0].rates[&Resource::Electricity], 1.0);
        assert_eq!(shares[0].rates[&Resource::Computer], 0.5);
        for zone in &shares {
            let total: f64 = zone.shares.values().sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        }
        // Zone C has no records: all rates zero, so shares are uniform.
        for share in shares[2].shares.values() {
            assert_relative_eq!(*share, 0.25);
        }
        // Higher presence rate means a larger share.
        assert!(shares[0].shares[&Resource::Water] > shares[0].shares[&Resource::Books]);
    }

    #[test]
    fn flow_omits_empty_pairs() {
        let records = sample();
        let active: Vec<&Record> = records.iter().collect();
        let domains = Domains::from_records(&records);
        let flow = flow_graph(&active, &domains.school_types, &domains.zones);

        assert_eq!(flow.nodes, vec!["Public", "Privé", "A", "B"]);
        assert_eq!(
            flow.links,
            vec![
                FlowLink { source: 0, target: 2, value: 1 },
                FlowLink { source: 0, target: 3, value: 1 },
                FlowLink { source: 1, target: 2, value: 1 },
            ]
        );
    }

    #[test]
    fn radar_always_has_both_categories() {
        let records = vec![record("A", "Public", [2.0; 6], [false; 4])];
        let active: Vec<&Record> = records.iter().collect();
        let view = compute_view(&active, &Domains::from_records(&records)).unwrap();
        assert_eq!(view.radar.len(), 2);
        assert_eq!(view.radar[1].group, "Privé");
        assert!(view.radar[1].means.values().all(|v| *v == 0.0));
        assert_eq!(view.radar[0].means.len(), 6);
    }
}
