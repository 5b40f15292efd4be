use super::Meta;
use crate::{backend::MemoryBackend, params::Params};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::{collections::BTreeMap, sync::Arc};
use tessera_core::Blob;

#[derive(Default)]
struct FieldSummary {
	types: BTreeMap<&'static str, u64>,
	min: Option<f64>,
	max: Option<f64>,
}

impl FieldSummary {
	fn add(&mut self, value: &Value) {
		let kind = match value {
			Value::Null => "null",
			Value::Bool(_) => "boolean",
			Value::Number(_) => "number",
			Value::String(_) => "string",
			Value::Array(_) => "array",
			Value::Object(_) => "object",
		};
		*self.types.entry(kind).or_insert(0) += 1;
		if let Some(n) = value.as_f64() {
			self.min = Some(self.min.map_or(n, |m| m.min(n)));
			self.max = Some(self.max.map_or(n, |m| m.max(n)));
		}
	}

	fn into_json(self) -> Value {
		let mut summary = json!({ "types": self.types });
		if let (Some(min), Some(max)) = (self.min, self.max) {
			summary["extrema"] = json!({ "min": min, "max": max });
		}
		summary
	}
}

/// Record count and a per-field summary of value types and numeric extrema.
///
/// Nested objects are summarised with dotted field names, e.g. `pixel.x`.
#[derive(Debug)]
pub struct DefaultMeta {
	backend: Arc<MemoryBackend>,
}

impl DefaultMeta {
	pub fn new(backend: Arc<MemoryBackend>) -> DefaultMeta {
		DefaultMeta { backend }
	}
}

fn collect(prefix: &str, record: &Map<String, Value>, fields: &mut BTreeMap<String, FieldSummary>) {
	for (key, value) in record {
		let name = if prefix.is_empty() {
			key.clone()
		} else {
			format!("{prefix}.{key}")
		};
		if let Value::Object(inner) = value {
			collect(&name, inner, fields);
		} else {
			fields.entry(name).or_default().add(value);
		}
	}
}

#[async_trait]
impl Meta for DefaultMeta {
	fn parse(&mut self, params: &Value) -> Result<()> {
		Params::new(params, "meta")?;
		Ok(())
	}

	async fn create(&self, uri: &str) -> Result<Blob> {
		let dataset = self.backend.dataset(uri)?;
		let mut fields = BTreeMap::new();
		for record in dataset.records() {
			collect("", record, &mut fields);
		}
		let fields: Map<String, Value> = fields
			.into_iter()
			.map(|(name, summary)| (name, summary.into_json()))
			.collect();
		Ok(Blob::from(json!({ "count": dataset.len(), "fields": fields }).to_string()))
	}
}
