use super::Query;
use crate::{
	backend::{Record, get_number},
	params::Params,
};
use anyhow::{Result, ensure};
use serde_json::Value;

/// Checks that a numeric field lies within the given bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
	pub field: String,
	pub gt: Option<f64>,
	pub gte: Option<f64>,
	pub lt: Option<f64>,
	pub lte: Option<f64>,
}

impl Range {
	pub fn parse(params: &Value) -> Result<Range> {
		let params = Params::new(params, "query")?;
		let range = Range {
			field: params.str("field")?.to_owned(),
			gt: params.opt_f64("gt")?,
			gte: params.opt_f64("gte")?,
			lt: params.opt_f64("lt")?,
			lte: params.opt_f64("lte")?,
		};
		ensure!(
			range.gt.is_some() || range.gte.is_some() || range.lt.is_some() || range.lte.is_some(),
			"range has no valid range parameters"
		);
		Ok(range)
	}

	fn bounds(&self) -> [(&'static str, Option<f64>); 4] {
		[("gt", self.gt), ("gte", self.gte), ("lt", self.lt), ("lte", self.lte)]
	}
}

impl Query for Range {
	fn hash(&self) -> String {
		let mut parts = vec![Value::from(self.field.as_str())];
		for (name, bound) in self.bounds() {
			if let Some(bound) = bound {
				parts.push(Value::from(name));
				parts.push(Value::from(bound));
			}
		}
		Value::Array(parts).to_string()
	}

	fn matches(&self, record: &Record) -> bool {
		let Some(v) = get_number(record, &self.field) else {
			return false;
		};
		self.gt.is_none_or(|b| v > b)
			&& self.gte.is_none_or(|b| v >= b)
			&& self.lt.is_none_or(|b| v < b)
			&& self.lte.is_none_or(|b| v <= b)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn record(value: Value) -> Record {
		json!({ "age": value }).as_object().unwrap().clone()
	}

	#[test]
	fn parse_and_hash() -> Result<()> {
		let range = Range::parse(&json!({"field": "age", "gte": 19, "lt": 30.5}))?;
		assert_eq!(range.hash(), r#"["age","gte",19.0,"lt",30.5]"#);
		Ok(())
	}

	#[rstest]
	#[case(json!({"gte": 19}), "`field` parameter missing from query params")]
	#[case(json!({"field": "age"}), "range has no valid range parameters")]
	#[case(json!({"field": "age", "gt": "a"}), "`gt` parameter is not of type `number`")]
	#[case(json!("age"), "query params must be an object")]
	fn parse_errors(#[case] params: Value, #[case] message: &str) {
		assert_eq!(Range::parse(&params).unwrap_err().to_string(), message);
	}

	#[rstest]
	#[case(json!(18), false)]
	#[case(json!(19), true)]
	#[case(json!(29.9), true)]
	#[case(json!(30), false)]
	#[case(json!("25"), false)]
	fn matching(#[case] value: Value, #[case] expected: bool) -> Result<()> {
		let range = Range::parse(&json!({"field": "age", "gte": 19, "lt": 30}))?;
		assert_eq!(range.matches(&record(value)), expected);
		Ok(())
	}
}
