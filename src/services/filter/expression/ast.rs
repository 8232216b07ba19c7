//! This module defines the borrowed view the evaluator walks over a rule tree, and the type
//! categories used to decide comparator applicability

use std::fmt;

use serde_json::Value;

use crate::models::{ComparisonOperator, LogicalOperator, Rule};

#[derive(Debug, Clone, PartialEq)]
pub struct Condition<'a> {
	pub path: &'a str,
	pub operator: ComparisonOperator,
	pub value: &'a Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression<'a> {
	Condition(Condition<'a>),
	Logical {
		operator: LogicalOperator,
		rules: &'a [Rule],
	},
	// Neither a complete comparison nor a combinator; never satisfied
	Unsatisfiable,
}

impl<'a> From<&'a Rule> for Expression<'a> {
	fn from(rule: &'a Rule) -> Self {
		if rule.is_leaf() {
			return match rule.comparator {
				Some(operator) => Expression::Condition(Condition {
					path: &rule.path,
					operator,
					value: &rule.value,
				}),
				None => Expression::Unsatisfiable,
			};
		}

		match rule.operator {
			Some(operator) => Expression::Logical {
				operator,
				rules: &rule.rules,
			},
			None => Expression::Unsatisfiable,
		}
	}
}

/// Coarse dynamic type of a value. Two operands are only comparable when their kinds match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	Null,
	Bool,
	Integer,
	Float,
	String,
	Array,
	Object,
}

impl ValueKind {
	pub fn of(value: &Value) -> Self {
		match value {
			Value::Null => ValueKind::Null,
			Value::Bool(_) => ValueKind::Bool,
			Value::Number(n) if n.is_f64() => ValueKind::Float,
			Value::Number(_) => ValueKind::Integer,
			Value::String(_) => ValueKind::String,
			Value::Array(_) => ValueKind::Array,
			Value::Object(_) => ValueKind::Object,
		}
	}

	pub fn is_numeric(&self) -> bool {
		matches!(self, ValueKind::Integer | ValueKind::Float)
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ValueKind::Null => "null",
			ValueKind::Bool => "bool",
			ValueKind::Integer => "integer",
			ValueKind::Float => "float",
			ValueKind::String => "string",
			ValueKind::Array => "array",
			ValueKind::Object => "object",
		};
		f.write_str(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_leaf_rule_becomes_condition() {
		let rule = Rule::condition("a.b", ComparisonOperator::Gt, 3);
		assert_eq!(
			Expression::from(&rule),
			Expression::Condition(Condition {
				path: "a.b",
				operator: ComparisonOperator::Gt,
				value: &json!(3),
			})
		);
	}

	#[test]
	fn test_combinator_rule_becomes_logical() {
		let rule = Rule::or(vec![Rule::condition("a", ComparisonOperator::Eq, 1)]);
		match Expression::from(&rule) {
			Expression::Logical { operator, rules } => {
				assert_eq!(operator, LogicalOperator::Or);
				assert_eq!(rules.len(), 1);
			}
			other => panic!("expected logical expression, got {:?}", other),
		}
	}

	#[test]
	fn test_malformed_rules_are_unsatisfiable() {
		assert_eq!(
			Expression::from(&Rule::default()),
			Expression::Unsatisfiable
		);

		let no_comparator = Rule {
			path: "a".to_string(),
			..Default::default()
		};
		assert_eq!(Expression::from(&no_comparator), Expression::Unsatisfiable);
	}

	#[test]
	fn test_path_takes_precedence_over_operator() {
		let mut rule = Rule::condition("a", ComparisonOperator::Eq, 1);
		rule.operator = Some(LogicalOperator::Not);
		assert!(matches!(Expression::from(&rule), Expression::Condition(_)));
	}

	#[test]
	fn test_value_kinds() {
		assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
		assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
		assert_eq!(ValueKind::of(&json!(-4)), ValueKind::Integer);
		assert_eq!(ValueKind::of(&json!(u64::MAX)), ValueKind::Integer);
		assert_eq!(ValueKind::of(&json!(4.0)), ValueKind::Float);
		assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
		assert_eq!(ValueKind::of(&json!([1, "a"])), ValueKind::Array);
		assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
		assert!(ValueKind::Float.is_numeric());
		assert!(!ValueKind::String.is_numeric());
	}
}
