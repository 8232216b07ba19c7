use serde_json::Value;
use thiserror::Error;

use crate::{
	models::{ComparisonOperator, LogicalOperator, Rule},
	services::filter::expression::ast::Expression,
};

#[derive(Debug, PartialEq, Eq, Error)]
pub enum EvaluationError {
	#[error("Invalid rule: {0}")]
	InvalidRule(String),
	#[error("Type mismatch: {0}")]
	TypeMismatch(String),
	#[error("Unsupported comparator: {op}")]
	UnsupportedComparator { op: String },
	#[error("Type coercion failed: {0}")]
	TypeCoercion(String),
	#[error("Rule nesting exceeds the maximum depth of {0}")]
	MaxDepthExceeded(usize),
}

pub trait ConditionEvaluator {
	/// Gets the stored value for an exact flattened path
	fn get_value(&self, path: &str) -> Option<&Value>;

	/// Performs the final comparison between the stored value and the rule literal
	fn compare_final_values(
		&self,
		left: &Value,
		operator: &ComparisonOperator,
		right: &Value,
	) -> Result<bool, EvaluationError>;

	/// Evaluates one leaf comparison. A missing path leaves the condition unsatisfied.
	fn evaluate_condition(
		&self,
		path: &str,
		operator: &ComparisonOperator,
		value: &Value,
	) -> Result<bool, EvaluationError> {
		match self.get_value(path) {
			Some(stored) => self.compare_final_values(stored, operator, value),
			None => {
				tracing::trace!("Path '{}' not present, condition unsatisfied", path);
				Ok(false)
			}
		}
	}
}

/// Walks the rule tree and uses ConditionEvaluator to evaluate leaf comparisons
/// Returns true if the rule is satisfied, false otherwise
/// Returns an error if any comparison anywhere in the tree is invalid, since AND and OR
/// evaluate every child instead of short-circuiting
pub fn evaluate(
	rule: &Rule,
	evaluator: &impl ConditionEvaluator,
	max_depth: usize,
) -> Result<bool, EvaluationError> {
	evaluate_at_depth(rule, evaluator, 0, max_depth)
}

fn evaluate_at_depth(
	rule: &Rule,
	evaluator: &impl ConditionEvaluator,
	depth: usize,
	max_depth: usize,
) -> Result<bool, EvaluationError> {
	match Expression::from(rule) {
		Expression::Condition(condition) => {
			let result =
				evaluator.evaluate_condition(condition.path, &condition.operator, condition.value)?;
			tracing::trace!(
				"Condition '{} {} {}' evaluated to: {}",
				condition.path,
				condition.operator,
				condition.value,
				result
			);
			Ok(result)
		}
		Expression::Logical { operator, rules } => {
			if depth >= max_depth {
				return Err(EvaluationError::MaxDepthExceeded(max_depth));
			}
			let result = evaluate_logical(operator, rules, evaluator, depth + 1, max_depth)?;
			tracing::trace!(
				"{} over {} rule(s) evaluated to: {}",
				operator,
				rules.len(),
				result
			);
			Ok(result)
		}
		Expression::Unsatisfiable => {
			tracing::warn!(
				"Rule has neither a complete comparison nor an operator, treating as unsatisfied: {:?}",
				rule
			);
			Ok(false)
		}
	}
}

fn evaluate_logical(
	operator: LogicalOperator,
	rules: &[Rule],
	evaluator: &impl ConditionEvaluator,
	depth: usize,
	max_depth: usize,
) -> Result<bool, EvaluationError> {
	match operator {
		LogicalOperator::And => {
			let mut result = true;
			for rule in rules {
				let matched = evaluate_at_depth(rule, evaluator, depth, max_depth)?;
				result &= matched;
			}
			Ok(result)
		}
		LogicalOperator::Or => {
			let mut result = false;
			for rule in rules {
				let matched = evaluate_at_depth(rule, evaluator, depth, max_depth)?;
				result |= matched;
			}
			Ok(result)
		}
		LogicalOperator::Not => {
			let [rule] = rules else {
				return Err(EvaluationError::InvalidRule(format!(
					"NOT expects exactly one rule, found {}",
					rules.len()
				)));
			};
			Ok(!evaluate_at_depth(rule, evaluator, depth, max_depth)?)
		}
	}
}
