//! Rule filtering service.
//!
//! Evaluates declarative rules against structured objects:
//! - Flattens the candidate object into dotted paths
//! - Walks the rule tree without short-circuiting, so every invalid comparison surfaces
//! - Compares values by type category, rejecting mismatched operands

mod engine;
mod error;
mod evaluator;
pub mod expression;

pub use engine::{apply, match_condition, RuleEngine};
pub use error::FilterError;
pub use evaluator::FlatObjectEvaluator;
