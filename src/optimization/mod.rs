//! Balance aggregation and debt simplification.

pub mod aggregator;
pub mod engine;
pub mod planner;
pub mod summary;
