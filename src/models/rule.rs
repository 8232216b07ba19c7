//! Declarative rule model.
//!
//! A rule is either a leaf comparison (`path`, `comparator`, `value`) or a combinator
//! (`operator`, `rules`). Rules are decoded from their wire shape and evaluated as-is.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied between a stored field value and a rule literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
	#[serde(rename = "=", alias = "==", alias = "eq")]
	Eq,
	#[serde(rename = "!=", alias = "neq", alias = "ne")]
	Ne,
	#[serde(rename = ">", alias = "gt")]
	Gt,
	#[serde(rename = ">=", alias = "gte")]
	Gte,
	#[serde(rename = "<", alias = "lt")]
	Lt,
	#[serde(rename = "<=", alias = "lte")]
	Lte,
	#[serde(rename = "contains")]
	Contains,
	#[serde(rename = "contains all", alias = "contains_all")]
	ContainsAll,
	#[serde(rename = "contains any", alias = "contains_any")]
	ContainsAny,
}

impl ComparisonOperator {
	/// Wire spelling of the comparator
	pub fn as_str(&self) -> &'static str {
		match self {
			ComparisonOperator::Eq => "=",
			ComparisonOperator::Ne => "!=",
			ComparisonOperator::Gt => ">",
			ComparisonOperator::Gte => ">=",
			ComparisonOperator::Lt => "<",
			ComparisonOperator::Lte => "<=",
			ComparisonOperator::Contains => "contains",
			ComparisonOperator::ContainsAll => "contains all",
			ComparisonOperator::ContainsAny => "contains any",
		}
	}
}

impl fmt::Display for ComparisonOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Boolean combinator over child rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
	#[serde(rename = "AND", alias = "and")]
	And,
	#[serde(rename = "OR", alias = "or")]
	Or,
	#[serde(rename = "NOT", alias = "not")]
	Not,
}

impl fmt::Display for LogicalOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LogicalOperator::And => f.write_str("AND"),
			LogicalOperator::Or => f.write_str("OR"),
			LogicalOperator::Not => f.write_str("NOT"),
		}
	}
}

/// A node of a rule tree.
///
/// Only one group of fields is expected to be populated: `path`/`comparator`/`value` for a
/// leaf, `operator`/`rules` for a combinator. A non-empty `path` makes the node a leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub comparator: Option<ComparisonOperator>,
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub value: Value,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub operator: Option<LogicalOperator>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub rules: Vec<Rule>,
}

impl Rule {
	/// Builds a leaf comparison
	pub fn condition(
		path: impl Into<String>,
		comparator: ComparisonOperator,
		value: impl Into<Value>,
	) -> Self {
		Self {
			path: path.into(),
			comparator: Some(comparator),
			value: value.into(),
			..Default::default()
		}
	}

	/// Builds a combinator node
	pub fn logical(operator: LogicalOperator, rules: Vec<Rule>) -> Self {
		Self {
			operator: Some(operator),
			rules,
			..Default::default()
		}
	}

	pub fn and(rules: Vec<Rule>) -> Self {
		Self::logical(LogicalOperator::And, rules)
	}

	pub fn or(rules: Vec<Rule>) -> Self {
		Self::logical(LogicalOperator::Or, rules)
	}

	pub fn not(rule: Rule) -> Self {
		Self::logical(LogicalOperator::Not, vec![rule])
	}

	pub fn is_leaf(&self) -> bool {
		!self.path.is_empty()
	}
}
