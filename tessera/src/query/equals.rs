use super::Query;
use crate::{
	backend::{Record, get_field},
	params::Params,
};
use anyhow::Result;
use serde_json::{Value, json};

/// Matches records whose field is exactly `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equals {
	pub field: String,
	pub value: Value,
}

impl Equals {
	pub fn parse(params: &Value) -> Result<Equals> {
		let params = Params::new(params, "query")?;
		Ok(Equals {
			field: params.str("field")?.to_owned(),
			value: params.value("value")?.clone(),
		})
	}
}

impl Query for Equals {
	fn hash(&self) -> String {
		json!([self.field, self.value]).to_string()
	}

	fn matches(&self, record: &Record) -> bool {
		match (get_field(record, &self.field), &self.value) {
			(Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
			(Some(a), b) => a == b,
			(None, _) => false,
		}
	}
}
