use serde_json::Value;
use thiserror::Error;
use winnow::{
	ascii::{digit1, space0, space1, Caseless},
	combinator::{alt, delimited, eof, not, opt, preceded, repeat, separated, terminated},
	error::{ContextError, StrContext},
	prelude::*,
	token::{literal, one_of, take_while},
};

use crate::models::{ComparisonOperator, LogicalOperator, Rule, DEFAULT_MAX_DEPTH};

/// --- Error definitions ---
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ExpressionParseError {
	#[error("Failed to parse rule expression: {0}")]
	Parser(String),
}

/// --- Helper aliases ---
type Input<'a> = &'a str;
type ParserResult<T> = winnow::Result<T>;

const RESERVED_WORDS: &[&str] = &["true", "false", "null", "and", "or", "not"];

/// Bound on nested negations, parentheses and lists
const MAX_NESTING_DEPTH: usize = DEFAULT_MAX_DEPTH;

fn nesting_too_deep() -> ContextError {
	let mut context = ContextError::new();
	context.push(StrContext::Label("nesting too deep"));
	context
}

/// Matches a case-insensitive keyword that is not followed by another word character
fn keyword<'a>(word: &'static str) -> impl Parser<Input<'a>, &'a str, ContextError> {
	terminated(
		literal(Caseless(word)),
		not(one_of(|c: char| c.is_alphanumeric() || c == '_')),
	)
}

/// --- Parser functions ---
/// Parses boolean literals into `Value::Bool`
fn parse_boolean(input: &mut Input<'_>) -> ParserResult<Value> {
	alt((
		literal("true").value(Value::Bool(true)),
		literal("false").value(Value::Bool(false)),
	))
	.parse_next(input)
}

fn parse_null(input: &mut Input<'_>) -> ParserResult<Value> {
	literal("null").value(Value::Null).parse_next(input)
}

/// Parses decimal literals with a fractional part into a float `Value::Number`
fn parse_float(input: &mut Input<'_>) -> ParserResult<Value> {
	(opt(one_of(['+', '-'])), digit1, '.', digit1)
		.take()
		.try_map(|number_str: &str| number_str.parse::<f64>())
		.map(Value::from)
		.parse_next(input)
}

/// Parses integer literals into an integer `Value::Number`
fn parse_integer(input: &mut Input<'_>) -> ParserResult<Value> {
	(opt(one_of(['+', '-'])), digit1)
		.take()
		.try_map(|number_str: &str| number_str.parse::<i64>())
		.map(Value::from)
		.parse_next(input)
}

// TODO: handle escaped quotes
/// Parses string literals enclosed in single or double quotes into `Value::String`
fn parse_string(input: &mut Input<'_>) -> ParserResult<Value> {
	alt((
		delimited('\'', take_while(0.., |c: char| c != '\''), '\''),
		delimited('"', take_while(0.., |c: char| c != '"'), '"'),
	))
	.map(|s: &str| Value::String(s.to_string()))
	.parse_next(input)
}

/// Parses a bracketed, comma separated list of values into `Value::Array`
fn parse_list(input: &mut Input<'_>, depth: usize) -> ParserResult<Value> {
	if depth >= MAX_NESTING_DEPTH {
		return Err(nesting_too_deep());
	}

	delimited(
		('[', space0),
		separated(
			0..,
			|input: &mut Input<'_>| parse_value(input, depth + 1),
			(space0, ',', space0),
		),
		(space0, ']'),
	)
	.map(Value::Array)
	.parse_next(input)
}

/// Parses any literal value (list, boolean, null, number or string)
/// Handles optional whitespace around the value
fn parse_value(input: &mut Input<'_>, depth: usize) -> ParserResult<Value> {
	delimited(
		space0,
		alt((
			|input: &mut Input<'_>| parse_list(input, depth),
			parse_boolean,
			parse_null,
			parse_float,
			parse_integer,
			parse_string,
		)),
		space0,
	)
	.parse_next(input)
}

/// Parses a dotted field path (e.g. "user.address.city")
fn parse_path<'a>(input: &mut Input<'a>) -> ParserResult<&'a str> {
	let path = (
		one_of(|c: char| c.is_alphabetic() || c == '_'),
		take_while(0.., |c: char| {
			c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
		}),
	)
		.take()
		.parse_next(input)?;

	// Check if the path is a reserved keyword
	if RESERVED_WORDS
		.iter()
		.any(|word| path.eq_ignore_ascii_case(word))
	{
		let mut context = ContextError::new();
		context.push(StrContext::Label("keyword used as path"));
		return Err(context);
	}
	Ok(path)
}

/// Parses a comparison operator (e.g. ==, !=, >=, contains all)
/// Handles optional whitespace around the operator
fn parse_comparison_operator(input: &mut Input<'_>) -> ParserResult<ComparisonOperator> {
	delimited(
		space0,
		alt((
			(keyword("contains"), space1, keyword("all")).value(ComparisonOperator::ContainsAll),
			(keyword("contains"), space1, keyword("any")).value(ComparisonOperator::ContainsAny),
			keyword("contains").value(ComparisonOperator::Contains),
			literal("==").value(ComparisonOperator::Eq),
			literal("!=").value(ComparisonOperator::Ne),
			literal(">=").value(ComparisonOperator::Gte),
			literal("<=").value(ComparisonOperator::Lte),
			literal(">").value(ComparisonOperator::Gt),
			literal("<").value(ComparisonOperator::Lt),
			literal("=").value(ComparisonOperator::Eq),
		)),
		space0,
	)
	.parse_next(input)
}

/// Parses a condition (e.g. "user.age >= 18") into a leaf `Rule`
fn parse_condition(input: &mut Input<'_>) -> ParserResult<Rule> {
	let (path, operator, value) = (
		parse_path,
		parse_comparison_operator,
		|input: &mut Input<'_>| parse_value(input, 0),
	)
		.parse_next(input)?;

	Ok(Rule::condition(path, operator, value))
}

/// Parses a negated term (e.g. "NOT a == 1" or "NOT(a == 1)")
fn parse_not(input: &mut Input<'_>, depth: usize) -> ParserResult<Rule> {
	preceded(keyword("NOT"), |input: &mut Input<'_>| {
		parse_term(input, depth + 1)
	})
	.map(Rule::not)
	.parse_next(input)
}

/// Parses the highest precedence components: negations, conditions and parenthesized
/// expressions. `depth` counts the negations and parentheses enclosing the term.
fn parse_term(input: &mut Input<'_>, depth: usize) -> ParserResult<Rule> {
	if depth > MAX_NESTING_DEPTH {
		return Err(nesting_too_deep());
	}

	delimited(
		space0,
		alt((
			|input: &mut Input<'_>| parse_not(input, depth),
			parse_condition,
			delimited(
				('(', space0),
				|input: &mut Input<'_>| parse_expression(input, depth + 1),
				(space0, ')'),
			),
		)),
		space0,
	)
	.parse_next(input)
}

/// Joins a chain of operands into one n-ary combinator, or returns the single operand
fn fold_chain(operator: LogicalOperator, first: Rule, rest: Vec<Rule>) -> Rule {
	if rest.is_empty() {
		return first;
	}

	let mut rules = Vec::with_capacity(rest.len() + 1);
	rules.push(first);
	rules.extend(rest);
	Rule::logical(operator, rules)
}

/// Parses the AND operator and its components
fn parse_and_expression(input: &mut Input<'_>, depth: usize) -> ParserResult<Rule> {
	let first = parse_term(input, depth)?;

	let and_operator_parser = delimited(space0, keyword("AND"), space0);
	let rest: Vec<Rule> = repeat(
		0..,
		preceded(and_operator_parser, |input: &mut Input<'_>| {
			parse_term(input, depth)
		}),
	)
	.parse_next(input)?;

	Ok(fold_chain(LogicalOperator::And, first, rest))
}

/// Parses the OR operator and its components
fn parse_or_expression(input: &mut Input<'_>, depth: usize) -> ParserResult<Rule> {
	let first = parse_and_expression(input, depth)?;

	let or_operator_parser = delimited(space0, keyword("OR"), space0);
	let rest: Vec<Rule> = repeat(
		0..,
		preceded(or_operator_parser, |input: &mut Input<'_>| {
			parse_and_expression(input, depth)
		}),
	)
	.parse_next(input)?;

	Ok(fold_chain(LogicalOperator::Or, first, rest))
}

/// Parses the entire expression, starting from the lowest precedence
fn parse_expression(input: &mut Input<'_>, depth: usize) -> ParserResult<Rule> {
	delimited(
		space0,
		|input: &mut Input<'_>| parse_or_expression(input, depth),
		space0,
	)
	.parse_next(input)
}

/// Public method, which parses a textual rule expression into a `Rule` tree
///
/// ```
/// use rule_evaluator::{parse, ComparisonOperator, Rule};
///
/// let rule = parse("user.age >= 18 AND user.roles contains any ['admin']").unwrap();
/// assert_eq!(
/// 	rule,
/// 	Rule::and(vec![
/// 		Rule::condition("user.age", ComparisonOperator::Gte, 18),
/// 		Rule::condition("user.roles", ComparisonOperator::ContainsAny, vec!["admin"]),
/// 	])
/// );
/// ```
pub fn parse(expression_str: &str) -> Result<Rule, ExpressionParseError> {
	// The expression must consume the whole input
	let mut full_expression_parser =
		(|input: &mut Input<'_>| parse_expression(input, 0), eof).map(|(expr, _)| expr);

	full_expression_parser
		.parse(expression_str)
		.map_err(|err| ExpressionParseError::Parser(err.to_string()))
}
