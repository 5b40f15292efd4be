use super::{Bivariate, MIME_JSON, Tile};
use crate::{
	backend::{Dataset, MemoryBackend, Record, get_field},
	params::Params,
	query::QueryExpression,
};
use anyhow::{Result, anyhow, ensure};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::{collections::HashMap, sync::Arc};
use tessera_core::{Blob, TileCoord};

/// Terms of a record field, which may hold a string or an array of strings.
fn terms_of<'a>(record: &'a Record, field: &str) -> Vec<&'a str> {
	match get_field(record, field) {
		Some(Value::String(term)) => vec![term.as_str()],
		Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
		_ => Vec::new(),
	}
}

fn count_terms<'a>(
	dataset: &'a Dataset,
	bivariate: &Bivariate,
	field: &str,
	coord: &TileCoord,
	query: Option<&'a QueryExpression>,
) -> HashMap<&'a str, u64> {
	let mut counts = HashMap::new();
	for record in dataset
		.filter(query)
		.filter(|record| bivariate.position(record, coord).is_some())
	{
		for term in terms_of(record, field) {
			*counts.entry(term).or_insert(0) += 1;
		}
	}
	counts
}

/// A JSON array of `{"term", "count"}` objects in iteration order.
fn to_blob<'a>(counts: impl Iterator<Item = (&'a str, u64)>) -> Blob {
	let entries: Vec<Value> = counts.map(|(term, count)| json!({"term": term, "count": count})).collect();
	Blob::from(Value::Array(entries).to_string())
}

/// The `termsCount` most frequent terms inside a tile, by descending count, ties by term.
#[derive(Debug)]
pub struct TopTermsTile {
	backend: Arc<MemoryBackend>,
	bivariate: Bivariate,
	terms_field: String,
	terms_count: usize,
}

impl TopTermsTile {
	pub fn new(backend: Arc<MemoryBackend>) -> TopTermsTile {
		TopTermsTile {
			backend,
			bivariate: Bivariate::default(),
			terms_field: String::new(),
			terms_count: 0,
		}
	}
}

#[async_trait]
impl Tile for TopTermsTile {
	fn parse(&mut self, params: &Value) -> Result<()> {
		self.bivariate = Bivariate::parse(params)?;
		let params = Params::new(params, "tile")?;
		self.terms_field = params.str("termsField")?.to_owned();
		self.terms_count = params.u32("termsCount")? as usize;
		Ok(())
	}

	async fn create(&self, uri: &str, coord: &TileCoord, query: Option<&QueryExpression>) -> Result<Blob> {
		let dataset = self.backend.dataset(uri)?;
		let mut counts: Vec<(&str, u64)> = count_terms(&dataset, &self.bivariate, &self.terms_field, coord, query)
			.into_iter()
			.collect();
		counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
		Ok(to_blob(counts.into_iter().take(self.terms_count)))
	}

	fn mime(&self) -> &'static str {
		MIME_JSON
	}
}

/// Counts of a fixed list of terms inside a tile, in list order. Terms that do not occur are omitted.
#[derive(Debug)]
pub struct TargetTermsTile {
	backend: Arc<MemoryBackend>,
	bivariate: Bivariate,
	terms_field: String,
	terms: Vec<String>,
}

impl TargetTermsTile {
	pub fn new(backend: Arc<MemoryBackend>) -> TargetTermsTile {
		TargetTermsTile {
			backend,
			bivariate: Bivariate::default(),
			terms_field: String::new(),
			terms: Vec::new(),
		}
	}
}

#[async_trait]
impl Tile for TargetTermsTile {
	fn parse(&mut self, params: &Value) -> Result<()> {
		self.bivariate = Bivariate::parse(params)?;
		let params = Params::new(params, "tile")?;
		self.terms_field = params.str("termsField")?.to_owned();
		self.terms = params
			.array("terms")?
			.iter()
			.map(|term| {
				term
					.as_str()
					.map(str::to_owned)
					.ok_or_else(|| anyhow!("`terms` parameter must only contain strings"))
			})
			.collect::<Result<_>>()?;
		ensure!(!self.terms.is_empty(), "`terms` parameter must not be empty");
		Ok(())
	}

	async fn create(&self, uri: &str, coord: &TileCoord, query: Option<&QueryExpression>) -> Result<Blob> {
		let dataset = self.backend.dataset(uri)?;
		let counts = count_terms(&dataset, &self.bivariate, &self.terms_field, coord, query);
		Ok(to_blob(
			self
				.terms
				.iter()
				.filter_map(|term| counts.get(term.as_str()).map(|n| (term.as_str(), *n))),
		))
	}

	fn mime(&self) -> &'static str {
		MIME_JSON
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn backend() -> Arc<MemoryBackend> {
		let mut backend = MemoryBackend::new();
		let records = json!([
			{"x": 10, "y": 10, "tags": ["rust", "tiles"]},
			{"x": 20, "y": 20, "tags": ["rust"]},
			{"x": 30, "y": 30, "tags": "maps"},
			{"x": 40, "y": 40, "tags": ["maps", "rust"]},
			{"x": 500, "y": 40, "tags": ["tiles"]},
		]);
		backend.add_dataset("docs", Dataset::from_value(records).unwrap()).unwrap();
		Arc::new(backend)
	}

	fn params(extra: Value) -> Value {
		let mut params = json!({"xField": "x", "yField": "y", "right": 100, "top": 100, "termsField": "tags"});
		for (key, value) in extra.as_object().unwrap() {
			params[key] = value.clone();
		}
		params
	}

	#[tokio::test]
	async fn top_terms() -> Result<()> {
		let mut tile = TopTermsTile::new(backend());
		tile.parse(&params(json!({"termsCount": 2})))?;
		let blob = tile.create("docs", &TileCoord::new(0, 0, 0), None).await?;
		assert_eq!(blob.as_str(), r#"[{"count":3,"term":"rust"},{"count":2,"term":"maps"}]"#);
		Ok(())
	}

	#[tokio::test]
	async fn top_terms_are_ranked() -> Result<()> {
		let mut tile = TopTermsTile::new(backend());
		tile.parse(&params(json!({"termsCount": 5})))?;
		let blob = tile.create("docs", &TileCoord::new(0, 0, 0), None).await?;
		let terms: Vec<Value> = serde_json::from_str::<Vec<Value>>(blob.as_str())?
			.into_iter()
			.map(|entry| entry["term"].clone())
			.collect();
		assert_eq!(terms, vec![json!("rust"), json!("maps"), json!("tiles")]);
		Ok(())
	}

	#[tokio::test]
	async fn target_terms() -> Result<()> {
		let mut tile = TargetTermsTile::new(backend());
		tile.parse(&params(json!({"terms": ["tiles", "missing", "maps"]})))?;
		let blob = tile.create("docs", &TileCoord::new(0, 0, 0), None).await?;
		assert_eq!(blob.as_str(), r#"[{"count":1,"term":"tiles"},{"count":2,"term":"maps"}]"#);
		Ok(())
	}

	#[test]
	fn parse_errors() {
		let mut tile = TopTermsTile::new(backend());
		let err = tile.parse(&params(json!({}))).unwrap_err();
		assert_eq!(err.to_string(), "`termsCount` parameter missing from tile params");

		let mut tile = TargetTermsTile::new(backend());
		let err = tile.parse(&params(json!({"terms": [1]}))).unwrap_err();
		assert_eq!(err.to_string(), "`terms` parameter must only contain strings");
	}
}
