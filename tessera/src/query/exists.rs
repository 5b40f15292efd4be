use super::Query;
use crate::{
	backend::{Record, get_field},
	params::Params,
};
use anyhow::Result;
use serde_json::{Value, json};

/// Matches records where the field is present and not null.
#[derive(Debug, Clone, PartialEq)]
pub struct Exists {
	pub field: String,
}

impl Exists {
	pub fn parse(params: &Value) -> Result<Exists> {
		let params = Params::new(params, "query")?;
		Ok(Exists {
			field: params.str("field")?.to_owned(),
		})
	}
}

impl Query for Exists {
	fn hash(&self) -> String {
		json!([self.field]).to_string()
	}

	fn matches(&self, record: &Record) -> bool {
		get_field(record, &self.field).is_some_and(|v| !v.is_null())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn null_does_not_exist() -> Result<()> {
		let exists = Exists::parse(&json!({"field": "a.b"}))?;
		assert_eq!(exists.hash(), r#"["a.b"]"#);
		assert!(exists.matches(json!({"a": {"b": 0}}).as_object().unwrap()));
		assert!(!exists.matches(json!({"a": {"b": null}}).as_object().unwrap()));
		assert!(!exists.matches(json!({"a": 1}).as_object().unwrap()));
		Ok(())
	}
}
