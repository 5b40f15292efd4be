use super::Query;
use crate::{
	backend::{Record, get_field},
	params::Params,
};
use anyhow::Result;
use serde_json::{Value, json};

/// Matches string fields starting with `prefix`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
	pub field: String,
	pub prefix: String,
}

impl Prefix {
	pub fn parse(params: &Value) -> Result<Prefix> {
		let params = Params::new(params, "query")?;
		Ok(Prefix {
			field: params.str("field")?.to_owned(),
			prefix: params.str("prefix")?.to_owned(),
		})
	}
}

impl Query for Prefix {
	fn hash(&self) -> String {
		json!([self.field, self.prefix]).to_string()
	}

	fn matches(&self, record: &Record) -> bool {
		get_field(record, &self.field)
			.and_then(Value::as_str)
			.is_some_and(|s| s.starts_with(&self.prefix))
	}
}
