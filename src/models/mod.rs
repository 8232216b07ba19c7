//! Domain models shared across the crate.

mod config;
mod rule;

pub use config::{ConfigError, EngineConfig, DEFAULT_MAX_DEPTH};
pub use rule::{ComparisonOperator, LogicalOperator, Rule};
