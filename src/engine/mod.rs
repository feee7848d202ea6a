pub mod metrics;
pub mod plan;
