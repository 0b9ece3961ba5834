//! Column schema of the student data file.
//!
//! Column names are the join key between the file and the code, so they are
//! spelled exactly as they appear in the source data.

use serde::Serialize;

pub const ZONE_COLUMN: &str = "Zone";
pub const SCHOOL_TYPE_COLUMN: &str = "Public / Privé";
pub const GENDER_COLUMN: &str = "Sexe";

/// Cell value marking a resource as present.
pub const FLAG_PRESENT: &str = "oui";

/// Numeric score attributes, all on a 0-10 scale once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Metric {
    #[serde(rename = "Score primaire")]
    Primary,
    #[serde(rename = "Score collégial")]
    Collegial,
    #[serde(rename = "Score actuel")]
    Current,
    #[serde(rename = "score en mathématiques")]
    Math,
    #[serde(rename = "score en langue arabe")]
    Arabic,
    #[serde(rename = "score en première langue")]
    FirstLanguage,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Primary,
        Metric::Collegial,
        Metric::Current,
        Metric::Math,
        Metric::Arabic,
        Metric::FirstLanguage,
    ];

    /// Metrics plotted by the school-type and zone bar charts.
    pub const SCORE_TYPES: [Metric; 3] = [Metric::Primary, Metric::Collegial, Metric::Current];

    pub fn column(self) -> &'static str {
        match self {
            Metric::Primary => "Score primaire",
            Metric::Collegial => "Score collégial",
            Metric::Current => "Score actuel",
            Metric::Math => "score en mathématiques",
            Metric::Arabic => "score en langue arabe",
            Metric::FirstLanguage => "score en première langue",
        }
    }

    /// Divisor applied at load time. Everything except the primary score is
    /// recorded on a 0-20 scale in the source file.
    pub fn divisor(self) -> f64 {
        match self {
            Metric::Primary => 1.0,
            _ => 2.0,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Resource-access flags shown in the stacked resource view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Resource {
    #[serde(rename = "Electricité")]
    Electricity,
    #[serde(rename = "Eau")]
    Water,
    #[serde(rename = "pc")]
    Computer,
    #[serde(rename = "Livres")]
    Books,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Electricity,
        Resource::Water,
        Resource::Computer,
        Resource::Books,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Resource::Electricity => "Electricité",
            Resource::Water => "Eau",
            Resource::Computer => "pc",
            Resource::Books => "Livres",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Every column the loader insists on finding in the header row.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    Metric::ALL
        .into_iter()
        .map(Metric::column)
        .chain([ZONE_COLUMN, SCHOOL_TYPE_COLUMN, GENDER_COLUMN])
        .chain(Resource::ALL.into_iter().map(Resource::column))
}
