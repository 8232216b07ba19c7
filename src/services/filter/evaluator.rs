//! Typed comparison of flattened object values against rule literals.

use serde_json::Value;

use crate::{
	models::ComparisonOperator,
	services::filter::expression::{
		compare_ordered_values, coerce_to_integers, coerce_to_strings, contains_all,
		contains_any, value_to_i64, ConditionEvaluator, EvaluationError, ValueKind,
	},
	utils::FlatObject,
};

/// Evaluates conditions against a flattened object.
///
/// Both operands of a comparison must share a [`ValueKind`]; otherwise the comparison fails
/// with [`EvaluationError::TypeMismatch`].
pub struct FlatObjectEvaluator<'a> {
	object: &'a FlatObject,
}

impl<'a> FlatObjectEvaluator<'a> {
	pub fn new(object: &'a FlatObject) -> Self {
		Self { object }
	}

	/// Compares two numbers of the same kind. Integers compare in the signed 64-bit domain,
	/// floats as f64.
	fn compare_numeric(
		&self,
		left: &Value,
		operator: &ComparisonOperator,
		right: &Value,
	) -> Result<bool, EvaluationError> {
		match (left, right) {
			(Value::Number(lhs), Value::Number(rhs)) if lhs.is_f64() => {
				let (Some(lhs), Some(rhs)) = (lhs.as_f64(), rhs.as_f64()) else {
					return Err(EvaluationError::TypeCoercion(format!(
						"Failed to read float operands {} and {}",
						lhs, rhs
					)));
				};
				tracing::debug!(
					"Comparing floats: left: {}, operator: {}, right: {}",
					lhs,
					operator,
					rhs
				);
				compare_ordered_values(&lhs, operator, &rhs)
			}
			(Value::Number(_), Value::Number(_)) => {
				let lhs = value_to_i64(left)?;
				let rhs = value_to_i64(right)?;
				tracing::debug!(
					"Comparing integers: left: {}, operator: {}, right: {}",
					lhs,
					operator,
					rhs
				);
				compare_ordered_values(&lhs, operator, &rhs)
			}
			_ => Err(EvaluationError::UnsupportedComparator {
				op: format!(
					"Operator '{}' not supported for type {}",
					operator,
					ValueKind::of(left)
				),
			}),
		}
	}

	fn compare_string(
		&self,
		left: &Value,
		operator: &ComparisonOperator,
		right: &Value,
	) -> Result<bool, EvaluationError> {
		let (Value::String(lhs), Value::String(rhs)) = (left, right) else {
			return Err(EvaluationError::UnsupportedComparator {
				op: format!(
					"Operator '{}' not supported for type {}",
					operator,
					ValueKind::of(left)
				),
			});
		};

		tracing::debug!(
			"Comparing strings: left: {}, operator: {}, right: {}",
			lhs,
			operator,
			rhs
		);

		match operator {
			ComparisonOperator::Contains => Ok(lhs.contains(rhs.as_str())),
			_ => Err(EvaluationError::UnsupportedComparator {
				op: format!("Operator '{}' not supported for string containment", operator),
			}),
		}
	}

	/// Membership test between two arrays.
	///
	/// The first element of the stored array decides the element domain: strings compare as
	/// strings, any number compares in the integer domain (floats truncated). Every element on
	/// both sides must coerce into that domain.
	fn compare_array(
		&self,
		left: &Value,
		operator: &ComparisonOperator,
		right: &Value,
	) -> Result<bool, EvaluationError> {
		let (Value::Array(haystack), Value::Array(needles)) = (left, right) else {
			return Err(EvaluationError::UnsupportedComparator {
				op: format!(
					"Operator '{}' not supported for type {}",
					operator,
					ValueKind::of(left)
				),
			});
		};

		tracing::debug!(
			"Comparing arrays: left: {}, operator: {}, right: {}",
			left,
			operator,
			right
		);

		if haystack.is_empty() || needles.is_empty() {
			return Ok(false);
		}

		match ValueKind::of(&haystack[0]) {
			ValueKind::String => {
				let haystack = coerce_to_strings(haystack)?;
				let needles = coerce_to_strings(needles)?;
				Self::match_members(&haystack, operator, &needles)
			}
			kind if kind.is_numeric() => {
				let haystack = coerce_to_integers(haystack)?;
				let needles = coerce_to_integers(needles)?;
				Self::match_members(&haystack, operator, &needles)
			}
			kind => Err(EvaluationError::UnsupportedComparator {
				op: format!(
					"Operator '{}' not supported for arrays of {}",
					operator, kind
				),
			}),
		}
	}

	fn match_members<T: PartialEq>(
		haystack: &[T],
		operator: &ComparisonOperator,
		needles: &[T],
	) -> Result<bool, EvaluationError> {
		match operator {
			ComparisonOperator::ContainsAll => Ok(contains_all(haystack, needles)),
			ComparisonOperator::ContainsAny => Ok(contains_any(haystack, needles)),
			_ => Err(EvaluationError::UnsupportedComparator {
				op: format!("Operator '{}' not supported for array membership", operator),
			}),
		}
	}
}

impl ConditionEvaluator for FlatObjectEvaluator<'_> {
	fn get_value(&self, path: &str) -> Option<&Value> {
		self.object.get(path)
	}

	fn compare_final_values(
		&self,
		left: &Value,
		operator: &ComparisonOperator,
		right: &Value,
	) -> Result<bool, EvaluationError> {
		let left_kind = ValueKind::of(left);
		let right_kind = ValueKind::of(right);

		if left_kind != right_kind {
			return Err(EvaluationError::TypeMismatch(format!(
				"Cannot compare {} value {} with {} literal {} using '{}'",
				left_kind, left, right_kind, right, operator
			)));
		}

		match operator {
			ComparisonOperator::Eq => Ok(left == right),
			ComparisonOperator::Ne => Ok(left != right),
			ComparisonOperator::Gt
			| ComparisonOperator::Gte
			| ComparisonOperator::Lt
			| ComparisonOperator::Lte => self.compare_numeric(left, operator, right),
			ComparisonOperator::Contains => self.compare_string(left, operator, right),
			ComparisonOperator::ContainsAll | ComparisonOperator::ContainsAny => {
				self.compare_array(left, operator, right)
			}
		}
	}
}
