use crate::request::{MetaRequest, TileRequest};
use serde_json::Value;

/// `{uri}:{z}/{x}/{y}:{tile}:{params}:{query}`, with an empty query part if there is no query.
///
/// Uri and tile type are JSON strings, params and query hash are canonical
/// JSON, so every part ends unambiguously and different requests never share
/// a fingerprint. Params are serialized with sorted keys, so equal params give
/// equal fingerprints.
#[must_use]
pub fn tile_fingerprint(request: &TileRequest) -> String {
	format!(
		"{}:{}:{}:{}:{}",
		Value::from(request.uri.as_str()),
		request.coord,
		Value::from(request.tile.id.as_str()),
		request.tile.params_hash(),
		request.query.as_ref().map(|q| q.hash()).unwrap_or_default()
	)
}

/// `{uri}:meta:{meta}:{params}`, quoted like [`tile_fingerprint`].
#[must_use]
pub fn meta_fingerprint(request: &MetaRequest) -> String {
	format!(
		"{}:meta:{}:{}",
		Value::from(request.uri.as_str()),
		Value::from(request.meta.id.as_str()),
		request.meta.params_hash()
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		backend::MemoryBackend,
		registry::Registry,
		validator::{validate_meta_request, validate_tile_request},
	};
	use serde_json::json;
	use std::sync::Arc;

	fn fingerprint(args: &Value) -> String {
		let registry = Registry::new_default(Arc::new(MemoryBackend::new()));
		tile_fingerprint(&validate_tile_request(args, &registry).unwrap())
	}

	#[test]
	fn tile_fingerprints() {
		let a = json!({
			"uri": "taxi",
			"coord": {"x": 1, "y": 2, "z": 3},
			"tile": {"micro": {"lod": 2, "xField": "x"}},
			"query": [{"exists": {"field": "tip"}}, "AND", {"range": {"field": "fare", "lte": 5}}],
		});
		assert_eq!(
			fingerprint(&a),
			r#""taxi":3/1/2:"micro":{"lod":2,"xField":"x"}:({"exists":["tip"]} and {"range":["fare","lte",5.0]})"#
		);

		// key order of the params does not matter
		let b = json!({
			"tile": {"micro": {"xField": "x", "lod": 2}},
			"query": [{"exists": {"field": "tip"}}, "and", {"range": {"field": "fare", "lte": 5}}],
			"coord": {"z": 3, "y": 2, "x": 1},
			"uri": "taxi",
		});
		assert_eq!(fingerprint(&a), fingerprint(&b));
	}

	#[test]
	fn fingerprints_differ() {
		let base = json!({"uri": "taxi", "coord": {"x": 1, "y": 2, "z": 3}, "tile": {"count": {}}});
		let mut other_coord = base.clone();
		other_coord["coord"]["x"] = json!(2);
		let mut with_query = base.clone();
		with_query["query"] = json!({"exists": {"field": "tip"}});

		assert_eq!(fingerprint(&base), r#""taxi":3/1/2:"count":{}:"#);
		assert_ne!(fingerprint(&base), fingerprint(&other_coord));
		assert_eq!(fingerprint(&with_query), r#""taxi":3/1/2:"count":{}:{"exists":["tip"]}"#);
	}

	fn with_query(query: Value) -> Value {
		json!({"uri": "d", "coord": {"x": 0, "y": 0, "z": 0}, "tile": {"count": {}}, "query": query})
	}

	#[test]
	fn query_values_keep_their_type() {
		let number = with_query(json!({"equals": {"field": "n", "value": 2}}));
		let string = with_query(json!({"equals": {"field": "n", "value": "2"}}));
		assert_ne!(fingerprint(&number), fingerprint(&string));
	}

	#[test]
	fn separators_inside_values_do_not_collide() {
		let joined = with_query(json!({"has": {"field": "t", "values": ["a:b"]}}));
		let split = with_query(json!({"has": {"field": "t", "values": ["a", "b"]}}));
		assert_ne!(fingerprint(&joined), fingerprint(&split));

		let a = json!({"uri": "a:0/0/0", "coord": {"x": 0, "y": 0, "z": 0}, "tile": {"count": {}}});
		let b = json!({"uri": "a", "coord": {"x": 0, "y": 0, "z": 0}, "tile": {"count": {}}});
		assert_ne!(fingerprint(&a), fingerprint(&b));
	}

	#[test]
	fn meta_fingerprints() {
		let registry = Registry::new_default(Arc::new(MemoryBackend::new()));
		let request = validate_meta_request(&json!({"uri": "taxi", "meta": {"default": {}}}), &registry).unwrap();
		assert_eq!(meta_fingerprint(&request), r#""taxi":meta:"default":{}"#);
	}
}
