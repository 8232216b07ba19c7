//! Boolean rule evaluation over structured data.
//!
//! An object is flattened into dotted paths (`user.address.city`) and a declarative rule
//! tree of comparisons combined with AND/OR/NOT is evaluated against it.
//!
//! ```
//! use rule_evaluator::{apply, Rule};
//! use serde_json::json;
//!
//! let rule: Rule = serde_json::from_value(json!({
//! 	"operator": "AND",
//! 	"rules": [
//! 		{ "path": "user.age", "comparator": ">=", "value": 18 },
//! 		{ "path": "user.roles", "comparator": "contains any", "value": ["admin"] }
//! 	]
//! }))
//! .unwrap();
//!
//! let object = json!({ "user": { "age": 30, "roles": ["admin", "ops"] } });
//! assert!(apply(&object, &rule).unwrap());
//! ```

pub mod models;
pub mod services;
pub mod utils;

pub use models::{ComparisonOperator, ConfigError, EngineConfig, LogicalOperator, Rule};
pub use services::filter::{
	apply,
	expression::{parse, EvaluationError, ExpressionParseError},
	match_condition, FilterError, RuleEngine,
};
pub use utils::{flatten, unflatten, FlatObject, FlattenError};
