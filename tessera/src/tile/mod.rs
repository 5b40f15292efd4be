//! Tile types: parse their parameters, then generate a payload for one coordinate.
//!
//! Every tile type shares the bivariate tiling parameters of [`Bivariate`],
//! which map two numeric record fields onto the tile pyramid.

mod bivariate;
mod count;
mod edge;
mod micro;
mod terms;

pub use bivariate::{Bivariate, Extent};
pub use count::CountTile;
pub use edge::EdgeTile;
pub use micro::MicroTile;
pub use terms::{TargetTermsTile, TopTermsTile};

use crate::query::QueryExpression;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Debug, sync::Arc};
use tessera_core::{Blob, TileCoord};

/// Mime type of binary LOD payloads.
pub const MIME_BINARY: &str = "application/octet-stream";
/// Mime type of aggregate tiles.
pub const MIME_JSON: &str = "application/json";

#[async_trait]
pub trait Tile: Debug + Send + Sync {
	/// Reads the tile parameters. Called once, before [`Tile::create`].
	fn parse(&mut self, params: &Value) -> Result<()>;

	/// Generates the payload for `coord` from the records of dataset `uri`.
	async fn create(&self, uri: &str, coord: &TileCoord, query: Option<&QueryExpression>) -> Result<Blob>;

	fn mime(&self) -> &'static str;
}

/// A parsed tile type together with its registered name and parameters.
#[derive(Debug, Clone)]
pub struct TileInstance {
	pub id: String,
	pub params: Value,
	pub tile: Arc<dyn Tile>,
}

impl TileInstance {
	/// Canonical text of the parameters: object keys sorted, no whitespace.
	#[must_use]
	pub fn params_hash(&self) -> String {
		self.params.to_string()
	}
}
