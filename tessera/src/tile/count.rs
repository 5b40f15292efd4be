use super::{Bivariate, MIME_JSON, Tile};
use crate::{backend::MemoryBackend, query::QueryExpression};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tessera_core::{Blob, TileCoord};

/// Counts the matching records inside a tile: `{"count": n}`.
#[derive(Debug)]
pub struct CountTile {
	backend: Arc<MemoryBackend>,
	bivariate: Bivariate,
}

impl CountTile {
	pub fn new(backend: Arc<MemoryBackend>) -> CountTile {
		CountTile {
			backend,
			bivariate: Bivariate::default(),
		}
	}
}

#[async_trait]
impl Tile for CountTile {
	fn parse(&mut self, params: &Value) -> Result<()> {
		self.bivariate = Bivariate::parse(params)?;
		Ok(())
	}

	async fn create(&self, uri: &str, coord: &TileCoord, query: Option<&QueryExpression>) -> Result<Blob> {
		let dataset = self.backend.dataset(uri)?;
		let count = dataset
			.filter(query)
			.filter(|record| self.bivariate.position(record, coord).is_some())
			.count();
		Ok(Blob::from(json!({ "count": count }).to_string()))
	}

	fn mime(&self) -> &'static str {
		MIME_JSON
	}
}
