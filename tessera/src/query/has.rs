use super::Query;
use crate::{
	backend::{Record, get_field},
	params::Params,
};
use anyhow::{Result, ensure};
use serde_json::{Value, json};

/// Matches records whose field equals, or as an array contains, any of `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct Has {
	pub field: String,
	pub values: Vec<Value>,
}

impl Has {
	pub fn parse(params: &Value) -> Result<Has> {
		let params = Params::new(params, "query")?;
		let field = params.str("field")?.to_owned();
		let values = params.array("values")?.clone();
		ensure!(!values.is_empty(), "`values` parameter must not be empty");
		Ok(Has { field, values })
	}
}

impl Query for Has {
	fn hash(&self) -> String {
		json!([self.field, self.values]).to_string()
	}

	fn matches(&self, record: &Record) -> bool {
		match get_field(record, &self.field) {
			Some(Value::Array(items)) => items.iter().any(|item| self.values.contains(item)),
			Some(value) => self.values.contains(value),
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn matches_scalars_and_arrays() -> Result<()> {
		let has = Has::parse(&json!({"field": "tags", "values": ["a", "b"]}))?;
		assert_eq!(has.hash(), r#"["tags",["a","b"]]"#);
		let r = |v: Value| json!({ "tags": v }).as_object().unwrap().clone();
		assert!(has.matches(&r(json!("a"))));
		assert!(has.matches(&r(json!(["x", "b"]))));
		assert!(!has.matches(&r(json!(["x"]))));
		assert!(!has.matches(&Record::new()));
		Ok(())
	}

	#[test]
	fn values_containing_separators_hash_apart() -> Result<()> {
		let joined = Has::parse(&json!({"field": "t", "values": ["a:b"]}))?;
		let split = Has::parse(&json!({"field": "t", "values": ["a", "b"]}))?;
		assert_eq!(joined.hash(), r#"["t",["a:b"]]"#);
		assert_ne!(joined.hash(), split.hash());
		Ok(())
	}

	#[test]
	fn rejects_empty_values() {
		let err = Has::parse(&json!({"field": "tags", "values": []})).unwrap_err();
		assert_eq!(err.to_string(), "`values` parameter must not be empty");
	}
}
