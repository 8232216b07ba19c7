//! Conversion between nested JSON objects and flat maps keyed by dotted paths.
//!
//! `.` is reserved as the path separator. A field name that itself contains `.` cannot be
//! told apart from a nested field after flattening.

use serde_json::{Map, Value};
use thiserror::Error;

pub const PATH_SEPARATOR: char = '.';

/// Flat view of an object: dotted path -> non-object leaf value
pub type FlatObject = Map<String, Value>;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum FlattenError {
	#[error("Conflicting paths while unflattening: {0}")]
	PathConflict(String),
}

/// Flattens nested objects into dotted paths.
///
/// Arrays and scalars are copied unchanged; only objects are descended into. An empty nested
/// object produces no entries.
pub fn flatten(object: &Map<String, Value>) -> FlatObject {
	let mut flattened = FlatObject::new();

	for (key, value) in object {
		match value {
			Value::Object(child) => {
				for (nested_key, nested_value) in flatten(child) {
					flattened.insert(
						format!("{}{}{}", key, PATH_SEPARATOR, nested_key),
						nested_value,
					);
				}
			}
			_ => {
				flattened.insert(key.clone(), value.clone());
			}
		}
	}

	flattened
}

/// Rebuilds the nested object described by a flat map.
///
/// Fails when one path is a strict prefix of another, since the shorter one would have to
/// be both a leaf and an object.
pub fn unflatten(flat: &FlatObject) -> Result<Map<String, Value>, FlattenError> {
	let mut tree = Map::new();

	for (key, value) in flat {
		let (parents, leaf) = match key.rsplit_once(PATH_SEPARATOR) {
			Some((parents, leaf)) => (Some(parents), leaf),
			None => (None, key.as_str()),
		};

		let mut node = &mut tree;
		for segment in parents.into_iter().flat_map(|p| p.split(PATH_SEPARATOR)) {
			let child = node
				.entry(segment.to_string())
				.or_insert_with(|| Value::Object(Map::new()));
			node = match child {
				Value::Object(map) => map,
				_ => {
					return Err(FlattenError::PathConflict(format!(
						"'{}' descends into non-object segment '{}'",
						key, segment
					)))
				}
			};
		}

		if matches!(node.get(leaf), Some(Value::Object(_))) {
			return Err(FlattenError::PathConflict(format!(
				"'{}' is both a leaf and a parent path",
				key
			)));
		}
		node.insert(leaf.to_string(), value.clone());
	}

	Ok(tree)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn as_map(value: Value) -> Map<String, Value> {
		match value {
			Value::Object(map) => map,
			other => panic!("expected object, got {}", other),
		}
	}

	#[test]
	fn test_flatten_nested_object() {
		let object = as_map(json!({
			"user": {
				"age": 30,
				"profile": { "name": "ada", "tags": ["a", "b"] }
			},
			"active": true
		}));

		let flat = flatten(&object);

		assert_eq!(
			Value::Object(flat),
			json!({
				"user.age": 30,
				"user.profile.name": "ada",
				"user.profile.tags": ["a", "b"],
				"active": true
			})
		);
	}

	#[test]
	fn test_flatten_keeps_objects_inside_arrays() {
		let object = as_map(json!({ "items": [{ "id": 1 }, { "id": 2 }] }));
		let flat = flatten(&object);

		assert_eq!(flat.len(), 1);
		assert_eq!(flat["items"], json!([{ "id": 1 }, { "id": 2 }]));
	}

	#[test]
	fn test_flatten_leaves_no_objects() {
		let object = as_map(json!({ "a": { "b": { "c": { "d": null } } }, "e": 1.5 }));
		let flat = flatten(&object);

		assert!(flat.values().all(|value| !value.is_object()));
		assert_eq!(flat["a.b.c.d"], Value::Null);
	}

	#[test]
	fn test_round_trip() {
		let object = as_map(json!({
			"user": { "age": 30, "roles": ["admin", "ops"], "address": { "city": "Oslo" } },
			"score": 0.5,
			"flag": false,
			"nothing": null
		}));

		assert_eq!(unflatten(&flatten(&object)).unwrap(), object);
	}

	#[test]
	fn test_empty_nested_object_is_lost() {
		let object = as_map(json!({ "a": {}, "b": 1 }));
		let flat = flatten(&object);

		assert_eq!(Value::Object(flat.clone()), json!({ "b": 1 }));
		assert_eq!(unflatten(&flat).unwrap(), as_map(json!({ "b": 1 })));
	}

	#[test]
	fn test_dotted_field_name_is_ambiguous() {
		let object = as_map(json!({ "a.b": 1 }));
		let flat = flatten(&object);

		assert_eq!(flat["a.b"], json!(1));
		assert_eq!(unflatten(&flat).unwrap(), as_map(json!({ "a": { "b": 1 } })));
	}

	#[test]
	fn test_unflatten_path_conflict() {
		let flat = as_map(json!({ "a": 1, "a.b": 2 }));
		assert!(matches!(
			unflatten(&flat),
			Err(FlattenError::PathConflict(_))
		));
	}
}
