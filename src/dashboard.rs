//! Dashboard controller: owns the loaded records and the current filter.

use std::path::Path;

use tracing::{debug, info};

use crate::aggregate::{self, DashboardView, Domains};
use crate::error::Result;
use crate::filter::{self, FilterPredicate, WILDCARD};
use crate::models::Record;
use crate::normalize;

/// Choices offered by each selector, `all` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub zone: Vec<String>,
    pub school_type: Vec<String>,
    pub gender: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<Record>,
    domains: Domains,
    predicate: FilterPredicate,
    active: Vec<usize>,
}

impl Dashboard {
    pub async fn load(path: &Path) -> Result<Self> {
        let records = normalize::load_records(path).await?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let domains = Domains::from_records(&records);
        let active = (0..records.len()).collect();
        Self {
            records,
            domains,
            predicate: FilterPredicate::default(),
            active,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    pub fn options(&self) -> FilterOptions {
        let with_wildcard = |values: &[String]| -> Vec<String> {
            std::iter::once(WILDCARD.to_string())
                .chain(values.iter().cloned())
                .collect()
        };
        FilterOptions {
            zone: with_wildcard(&self.domains.zones),
            school_type: with_wildcard(&self.domains.school_types),
            gender: with_wildcard(&self.domains.genders),
        }
    }

    /// Replaces the current predicate and recomputes the active subset.
    pub fn apply_filters(&mut self, predicate: FilterPredicate) {
        self.active = filter::select(&self.records, &predicate);
        info!(
            zone = %predicate.zone,
            school_type = %predicate.school_type,
            gender = %predicate.gender,
            active = self.active.len(),
            total = self.records.len(),
            "filters applied"
        );
        self.predicate = predicate;
    }

    pub fn reset(&mut self) {
        self.apply_filters(FilterPredicate::default());
    }

    pub fn active(&self) -> impl Iterator<Item = &Record> + '_ {
        self.active.iter().map(|&index| &self.records[index])
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Recomputes every chart aggregate from the active subset.
    pub fn render(&self) -> Result<DashboardView> {
        let active: Vec<&Record> = self.active().collect();
        debug!(active = active.len(), "rendering views");
        aggregate::compute_view(&active, &self.domains)
    }
}
