//! Rule application.
//!
//! Decodes a candidate object into a JSON map, flattens it once and walks the rule tree
//! against the flattened view. The engine only holds immutable configuration, so a single
//! instance can be shared across threads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
	models::{ComparisonOperator, ConfigError, EngineConfig, Rule},
	services::filter::{
		evaluator::FlatObjectEvaluator,
		expression::{evaluate, ConditionEvaluator, EvaluationError},
		FilterError,
	},
	utils::{flatten, FlatObject},
};

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
	config: EngineConfig,
}

impl RuleEngine {
	/// Creates an engine from a validated configuration
	pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self { config })
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Checks whether a rule applies to an object
	///
	/// # Arguments
	/// * `object` - Any value that serializes to a JSON object
	/// * `rule` - The rule tree to evaluate
	///
	/// # Returns
	/// * `Ok(bool)` - Whether the object satisfies the rule
	/// * `Err(FilterError::Decode)` - The object is not representable as a JSON object
	/// * `Err(FilterError::Evaluation)` - The rule is invalid for this object
	pub fn apply<T: Serialize + ?Sized>(
		&self,
		object: &T,
		rule: &Rule,
	) -> Result<bool, FilterError> {
		let object: Map<String, Value> = serde_json::from_value(serde_json::to_value(object)?)?;
		let flat = flatten(&object);

		tracing::debug!(
			"Applying rule to object with {} flattened field(s)",
			flat.len()
		);

		Ok(self.evaluate(&flat, rule)?)
	}

	/// Evaluates a rule against an already flattened object
	pub fn evaluate(&self, flat: &FlatObject, rule: &Rule) -> Result<bool, EvaluationError> {
		let evaluator = FlatObjectEvaluator::new(flat);
		evaluate(rule, &evaluator, self.config.max_depth)
	}
}

/// Checks whether a rule applies to an object, using the default configuration
pub fn apply<T: Serialize + ?Sized>(object: &T, rule: &Rule) -> Result<bool, FilterError> {
	RuleEngine::default().apply(object, rule)
}

/// Evaluates a single comparison against the entry stored under `path`.
/// A missing entry yields `false`.
pub fn match_condition(
	flat: &FlatObject,
	path: &str,
	operator: ComparisonOperator,
	value: &Value,
) -> Result<bool, EvaluationError> {
	FlatObjectEvaluator::new(flat).evaluate_condition(path, &operator, value)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::LogicalOperator;
	use serde_json::json;

	fn adult_admin_rule() -> Rule {
		Rule::and(vec![
			Rule::condition("user.age", ComparisonOperator::Gte, 18),
			Rule::condition("user.roles", ComparisonOperator::ContainsAny, json!(["admin"])),
		])
	}

	#[test]
	fn test_apply_end_to_end() {
		let object = json!({ "user": { "age": 30, "roles": ["admin", "ops"] } });
		assert!(apply(&object, &adult_admin_rule()).unwrap());

		let minor = json!({ "user": { "age": 15, "roles": ["admin", "ops"] } });
		assert!(!apply(&minor, &adult_admin_rule()).unwrap());
	}

	#[test]
	fn test_apply_missing_path_is_false() {
		let object = json!({ "user": { "age": 30 } });
		let rule = Rule::condition("user.missing", ComparisonOperator::Eq, "x");
		assert!(!apply(&object, &rule).unwrap());
	}

	#[test]
	fn test_apply_serializable_struct() {
		#[derive(Serialize)]
		struct Address {
			city: String,
		}

		#[derive(Serialize)]
		struct Customer {
			name: String,
			tier: u8,
			address: Address,
		}

		let customer = Customer {
			name: "Ada Lovelace".to_string(),
			tier: 3,
			address: Address {
				city: "London".to_string(),
			},
		};
		let rule = Rule::and(vec![
			Rule::condition("name", ComparisonOperator::Contains, "Ada"),
			Rule::condition("tier", ComparisonOperator::Gt, 2),
			Rule::condition("address.city", ComparisonOperator::Eq, "London"),
		]);

		assert!(apply(&customer, &rule).unwrap());
	}

	#[test]
	fn test_apply_rejects_non_object() {
		let rule = Rule::condition("a", ComparisonOperator::Eq, 1);
		assert!(matches!(
			apply(&json!([1, 2, 3]), &rule),
			Err(FilterError::Decode(_))
		));
		assert!(matches!(apply(&42, &rule), Err(FilterError::Decode(_))));
	}

	#[test]
	fn test_apply_surfaces_evaluation_errors() {
		let object = json!({ "x": 5 });

		let rule = Rule::condition("x", ComparisonOperator::Lt, "abc");
		assert!(matches!(
			apply(&object, &rule),
			Err(FilterError::Evaluation(EvaluationError::TypeMismatch(_)))
		));

		let rule = Rule::logical(
			LogicalOperator::Not,
			vec![
				Rule::condition("x", ComparisonOperator::Eq, 5),
				Rule::condition("x", ComparisonOperator::Eq, 6),
			],
		);
		assert!(matches!(
			apply(&object, &rule),
			Err(FilterError::Evaluation(EvaluationError::InvalidRule(_)))
		));
	}

	#[test]
	fn test_engine_respects_max_depth() {
		let engine = RuleEngine::new(EngineConfig { max_depth: 1 }).unwrap();
		let object = json!({ "x": 5 });

		let shallow = Rule::not(Rule::condition("x", ComparisonOperator::Eq, 6));
		assert!(engine.apply(&object, &shallow).unwrap());

		let deep = Rule::not(shallow);
		assert!(matches!(
			engine.apply(&object, &deep),
			Err(FilterError::Evaluation(EvaluationError::MaxDepthExceeded(1)))
		));
	}

	#[test]
	fn test_engine_rejects_invalid_config() {
		assert!(matches!(
			RuleEngine::new(EngineConfig { max_depth: 0 }),
			Err(ConfigError::Validation(_))
		));
		assert_eq!(
			RuleEngine::new(EngineConfig::default()).unwrap().config(),
			&EngineConfig::default()
		);
	}

	#[test]
	fn test_match_condition() {
		let Value::Object(flat) = json!({ "x": 5, "tags": ["a", "b"] }) else {
			unreachable!()
		};

		assert!(match_condition(&flat, "x", ComparisonOperator::Lte, &json!(5)).unwrap());
		assert!(
			match_condition(&flat, "tags", ComparisonOperator::ContainsAll, &json!(["b"]))
				.unwrap()
		);
		assert!(!match_condition(&flat, "y", ComparisonOperator::Eq, &json!(5)).unwrap());
		assert!(matches!(
			match_condition(&flat, "x", ComparisonOperator::Lt, &json!("abc")),
			Err(EvaluationError::TypeMismatch(_))
		));
	}

	#[test]
	fn test_engine_shared_across_threads() {
		let engine = RuleEngine::default();
		let rule = adult_admin_rule();
		let ages = [12_u32, 18, 40, 17, 65];

		let results: Vec<bool> = std::thread::scope(|scope| {
			let handles: Vec<_> = ages
				.iter()
				.map(|age| {
					let (engine, rule) = (&engine, &rule);
					scope.spawn(move || {
						let object = json!({ "user": { "age": age, "roles": ["admin"] } });
						engine.apply(&object, rule).unwrap()
					})
				})
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).collect()
		});

		assert_eq!(results, vec![false, true, true, false, true]);
	}
}
