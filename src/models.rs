use std::fmt;

use crate::schema::{Metric, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchoolType {
    Public,
    Private,
    /// Any other label found in the file, kept verbatim.
    Other(String),
}

impl SchoolType {
    pub const PUBLIC_LABEL: &'static str = "Public";
    pub const PRIVATE_LABEL: &'static str = "Privé";

    pub fn from_label(label: &str) -> Self {
        match label {
            Self::PUBLIC_LABEL => SchoolType::Public,
            Self::PRIVATE_LABEL => SchoolType::Private,
            other => SchoolType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SchoolType::Public => Self::PUBLIC_LABEL,
            SchoolType::Private => Self::PRIVATE_LABEL,
            SchoolType::Other(label) => label,
        }
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One normalized student observation. Built once at load time and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub zone: String,
    pub school_type: SchoolType,
    pub gender: String,
    pub scores: [f64; Metric::ALL.len()],
    pub resources: [bool; Resource::ALL.len()],
}

impl Record {
    pub fn score(&self, metric: Metric) -> f64 {
        self.scores[metric.index()]
    }

    pub fn has(&self, resource: Resource) -> bool {
        self.resources[resource.index()]
    }
}
