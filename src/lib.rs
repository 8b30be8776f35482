pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod proto;
pub mod stats;

pub use catalog::{classify, OperationClass};
pub use error::{Result, StatsError};
pub use models::{FamilyMap, MetricFamily, MetricKind, Sample, SampleValue};
pub use stats::{aggregate, Snapshot};
