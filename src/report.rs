//! Report builders and the aggregation tree they share.

pub mod aggregator;
pub mod failure;
pub mod health_summary;
pub mod mbo;
pub mod metric;
pub mod normalize;
pub mod render;

pub use aggregator::{aggregate, AggregateOptions, Aggregator, Defaults, Keys, Report};
pub use metric::{Breakdown, Count, Metric, Timing};
