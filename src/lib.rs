//! Data-transform core of the school performance dashboard: load and
//! normalize student records, filter them, and compute the aggregates each
//! chart draws.

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod report;
pub mod schema;
pub mod stats;

pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
