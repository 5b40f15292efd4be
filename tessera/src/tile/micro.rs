use super::{Bivariate, MIME_BINARY, Tile};
use crate::{backend::MemoryBackend, params::Params, query::QueryExpression};
use anyhow::{Result, ensure};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tessera_core::{
	Blob, TileCoord,
	lod::{MAX_LOD, Point, encode_lod},
};

const DEFAULT_LOD: u32 = 4;

/// Individual points inside a tile, encoded as a point LOD payload.
#[derive(Debug)]
pub struct MicroTile {
	backend: Arc<MemoryBackend>,
	bivariate: Bivariate,
	lod: u32,
	hits_count: Option<usize>,
}

impl MicroTile {
	pub fn new(backend: Arc<MemoryBackend>) -> MicroTile {
		MicroTile {
			backend,
			bivariate: Bivariate::default(),
			lod: DEFAULT_LOD,
			hits_count: None,
		}
	}
}

#[async_trait]
impl Tile for MicroTile {
	fn parse(&mut self, params: &Value) -> Result<()> {
		self.bivariate = Bivariate::parse(params)?;
		let params = Params::new(params, "tile")?;
		self.lod = params.opt_u32("lod")?.unwrap_or(DEFAULT_LOD);
		ensure!(self.lod <= MAX_LOD, "`lod` parameter must be <= {MAX_LOD}");
		self.hits_count = params.opt_u32("hitsCount")?.map(|n| n as usize);
		Ok(())
	}

	async fn create(&self, uri: &str, coord: &TileCoord, query: Option<&QueryExpression>) -> Result<Blob> {
		let dataset = self.backend.dataset(uri)?;
		let points: Vec<Point> = dataset
			.filter(query)
			.filter_map(|record| self.bivariate.position(record, coord))
			.take(self.hits_count.unwrap_or(usize::MAX))
			.map(|(x, y)| Point::new(x as f32, y as f32))
			.collect();
		log::trace!("micro tile {coord}: {} points", points.len());
		encode_lod(&points, self.lod)
	}

	fn mime(&self) -> &'static str {
		MIME_BINARY
	}
}
