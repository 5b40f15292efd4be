use super::{Bivariate, MIME_BINARY, Tile};
use crate::{
	backend::{MemoryBackend, Record, get_number},
	params::Params,
	query::QueryExpression,
};
use anyhow::{Result, ensure};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tessera_core::{
	Blob, TileCoord,
	lod::{Edge, MAX_LOD, Vertex, encode_lod},
};

const DEFAULT_LOD: u32 = 4;

/// Edges whose source lies inside a tile, encoded as an edge LOD payload.
///
/// Both endpoints are given in tile-local pixels, so the destination may lie
/// outside `[0, 256)`. Vertices carry the value of `weightField`, or `1`.
#[derive(Debug)]
pub struct EdgeTile {
	backend: Arc<MemoryBackend>,
	source: Bivariate,
	target: Bivariate,
	weight_field: Option<String>,
	lod: u32,
}

impl EdgeTile {
	pub fn new(backend: Arc<MemoryBackend>) -> EdgeTile {
		EdgeTile {
			backend,
			source: Bivariate::default(),
			target: Bivariate::default(),
			weight_field: None,
			lod: DEFAULT_LOD,
		}
	}

	fn edge(&self, record: &Record, coord: &TileCoord) -> Option<Edge> {
		let (x1, y1) = self.source.position(record, coord)?;
		let (x2, y2) = self.target.project(record, coord)?;
		let weight = match &self.weight_field {
			Some(field) => get_number(record, field)?,
			None => 1.0,
		} as f32;
		Some(Edge::new(
			Vertex::new(x1 as f32, y1 as f32, weight),
			Vertex::new(x2 as f32, y2 as f32, weight),
		))
	}
}

#[async_trait]
impl Tile for EdgeTile {
	fn parse(&mut self, params: &Value) -> Result<()> {
		let p = Params::new(params, "tile")?;
		for key in ["srcXField", "srcYField", "dstXField", "dstYField"] {
			p.str(key)?;
		}
		self.source = Bivariate::parse_fields(params, "srcXField", "srcYField")?;
		self.target = Bivariate::parse_fields(params, "dstXField", "dstYField")?;
		self.weight_field = p.opt_str("weightField")?.map(str::to_owned);
		self.lod = p.opt_u32("lod")?.unwrap_or(DEFAULT_LOD);
		ensure!(self.lod <= MAX_LOD, "`lod` parameter must be <= {MAX_LOD}");
		Ok(())
	}

	async fn create(&self, uri: &str, coord: &TileCoord, query: Option<&QueryExpression>) -> Result<Blob> {
		let dataset = self.backend.dataset(uri)?;
		let edges: Vec<Edge> = dataset
			.filter(query)
			.filter_map(|record| self.edge(record, coord))
			.collect();
		log::trace!("edge tile {coord}: {} edges", edges.len());
		encode_lod(&edges, self.lod)
	}

	fn mime(&self) -> &'static str {
		MIME_BINARY
	}
}
