//! Filter predicates over the record set.

use std::fmt;

use crate::models::{Record, SchoolType};

/// Selector text meaning "no constraint".
pub const WILDCARD: &str = "all";

/// One categorical constraint: either match everything or one exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str(WILDCARD),
            Selector::Only(value) => value.fmt(f),
        }
    }
}

impl Selector<String> {
    pub fn parse(value: &str) -> Self {
        if value == WILDCARD {
            Selector::All
        } else {
            Selector::Only(value.to_string())
        }
    }
}

impl Selector<SchoolType> {
    pub fn parse(value: &str) -> Self {
        if value == WILDCARD {
            Selector::All
        } else {
            Selector::Only(SchoolType::from_label(value))
        }
    }
}

/// Conjunction of the three dashboard selectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPredicate {
    pub zone: Selector<String>,
    pub school_type: Selector<SchoolType>,
    pub gender: Selector<String>,
}

impl FilterPredicate {
    /// Builds a predicate from optional selector values; `None` and `"all"`
    /// both mean no constraint.
    pub fn from_options(zone: Option<&str>, school_type: Option<&str>, gender: Option<&str>) -> Self {
        Self {
            zone: zone.map(Selector::<String>::parse).unwrap_or_default(),
            school_type: school_type
                .map(Selector::<SchoolType>::parse)
                .unwrap_or_default(),
            gender: gender.map(Selector::<String>::parse).unwrap_or_default(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.zone.matches(&record.zone)
            && self.school_type.matches(&record.school_type)
            && self.gender.matches(&record.gender)
    }
}

/// Positions of the records that satisfy `predicate`, in load order.
pub fn select(records: &[Record], predicate: &FilterPredicate) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| predicate.matches(record))
        .map(|(index, _)| index)
        .collect()
}
