//! Engine configuration.
//!
//! Loaded from a JSON file or built in code. Every field has a default, so an empty JSON
//! object is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on combinator nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Failed to read configuration file: {0}")]
	Io(#[from] std::io::Error),
	#[error("Failed to parse configuration: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("Invalid configuration: {0}")]
	Validation(String),
}

/// Settings that apply to every evaluation run by a [`crate::RuleEngine`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Maximum number of nested combinators below the root rule
	pub max_depth: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl EngineConfig {
	/// Reads, parses and validates a JSON configuration file
	pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		let config: EngineConfig = serde_json::from_str(&content)?;
		config.validate()?;

		tracing::debug!("Loaded engine configuration from {}: {:?}", path.display(), config);

		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_depth == 0 {
			return Err(ConfigError::Validation(
				"max_depth must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}
