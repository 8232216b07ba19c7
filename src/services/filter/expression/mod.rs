//! Shared logic for parsing and evaluating rule expressions

mod ast;
mod evaluation;
mod helpers;
mod parsing;

pub use ast::{Condition, Expression, ValueKind};
pub use evaluation::{evaluate, ConditionEvaluator, EvaluationError};
pub use helpers::{
	coerce_to_integers, coerce_to_strings, compare_ordered_values, contains_all, contains_any,
	value_to_i64,
};
pub use parsing::{parse, ExpressionParseError};
