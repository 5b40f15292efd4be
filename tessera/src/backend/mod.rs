//! Data backends that tiles and metas are generated from.
//!
//! Only an in-memory backend ships with Tessera: datasets are JSON arrays of
//! records, loaded once and addressed by the request URI.

mod memory;

pub use memory::{Dataset, MemoryBackend};

use serde_json::{Map, Value};

/// A single data record: a JSON object.
pub type Record = Map<String, Value>;

/// Looks up a possibly nested field using a dotted path such as `pixel.x`.
#[must_use]
pub fn get_field<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
	let mut parts = path.split('.');
	let mut value = record.get(parts.next()?)?;
	for part in parts {
		value = value.as_object()?.get(part)?;
	}
	Some(value)
}

/// Looks up a numeric field.
#[must_use]
pub fn get_number(record: &Record, path: &str) -> Option<f64> {
	get_field(record, path)?.as_f64()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn record() -> Record {
		json!({"name": "a", "pixel": {"x": 12, "y": 3.5}, "tags": ["t"]})
			.as_object()
			.unwrap()
			.clone()
	}

	#[test]
	fn nested_fields() {
		let r = record();
		assert_eq!(get_field(&r, "name"), Some(&json!("a")));
		assert_eq!(get_number(&r, "pixel.x"), Some(12.0));
		assert_eq!(get_number(&r, "pixel.y"), Some(3.5));
		assert_eq!(get_field(&r, "pixel.z"), None);
		assert_eq!(get_field(&r, "name.first"), None);
		assert_eq!(get_number(&r, "name"), None);
	}
}
