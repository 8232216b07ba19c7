//! Error types for rule application.

use thiserror::Error;

use crate::services::filter::expression::EvaluationError;

#[derive(Debug, Error)]
pub enum FilterError {
	/// The candidate object could not be serialized or is not a JSON object
	#[error("Failed to decode object: {0}")]
	Decode(#[from] serde_json::Error),
	#[error(transparent)]
	Evaluation(#[from] EvaluationError),
}
