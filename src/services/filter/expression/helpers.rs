//! Comparison helpers shared by condition evaluators: ordered comparisons, collection
//! membership and coercion of mixed-type sequences

use serde_json::Value;

use super::{ast::ValueKind, evaluation::EvaluationError};
use crate::models::ComparisonOperator;

/// Compares two values implementing PartialOrd using the specified comparison operator
/// Returns true if the comparison holds, false otherwise
/// Returns an error if the operator is not an equality or ordering operator
pub fn compare_ordered_values<T: PartialOrd>(
	left: &T,
	op: &ComparisonOperator,
	right: &T,
) -> Result<bool, EvaluationError> {
	match op {
		ComparisonOperator::Eq => Ok(left == right),
		ComparisonOperator::Ne => Ok(left != right),
		ComparisonOperator::Gt => Ok(left > right),
		ComparisonOperator::Gte => Ok(left >= right),
		ComparisonOperator::Lt => Ok(left < right),
		ComparisonOperator::Lte => Ok(left <= right),
		_ => Err(EvaluationError::UnsupportedComparator {
			op: format!("Unsupported operator for ordered types: {}", op),
		}),
	}
}

/// True if every needle is present in the haystack. Duplicate needles are checked
/// independently and an empty needle list is vacuously contained.
pub fn contains_all<T: PartialEq>(haystack: &[T], needles: &[T]) -> bool {
	needles.iter().all(|needle| haystack.contains(needle))
}

/// True if at least one needle is present in the haystack
pub fn contains_any<T: PartialEq>(haystack: &[T], needles: &[T]) -> bool {
	needles.iter().any(|needle| haystack.contains(needle))
}

/// Reads an integer value in the signed 64-bit domain
pub fn value_to_i64(value: &Value) -> Result<i64, EvaluationError> {
	value.as_i64().ok_or_else(|| {
		EvaluationError::TypeCoercion(format!(
			"Value {} is not an integer in the signed 64-bit range",
			value
		))
	})
}

/// Coerces every element to a string slice, failing on the first non-string element
pub fn coerce_to_strings(values: &[Value]) -> Result<Vec<&str>, EvaluationError> {
	values
		.iter()
		.map(|value| {
			value.as_str().ok_or_else(|| {
				EvaluationError::TypeCoercion(format!(
					"Expected string element, found {} ({})",
					ValueKind::of(value),
					value
				))
			})
		})
		.collect()
}

/// Coerces every element to the signed 64-bit integer domain, truncating floats.
/// Fails on the first non-numeric element.
pub fn coerce_to_integers(values: &[Value]) -> Result<Vec<i64>, EvaluationError> {
	values
		.iter()
		.map(|value| match value {
			Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f as i64).ok_or_else(|| {
				EvaluationError::TypeCoercion(format!("Invalid float element: {}", n))
			}),
			Value::Number(_) => value_to_i64(value),
			_ => Err(EvaluationError::TypeCoercion(format!(
				"Expected numeric element, found {} ({})",
				ValueKind::of(value),
				value
			))),
		})
		.collect()
}
