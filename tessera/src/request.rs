//! Typed requests, produced only by the validator.

use crate::{meta::MetaInstance, query::QueryExpression, tile::TileInstance};
use std::fmt::{self, Display};
use tessera_core::TileCoord;

#[derive(Debug)]
pub struct TileRequest {
	pub uri: String,
	pub coord: TileCoord,
	pub tile: TileInstance,
	pub query: Option<QueryExpression>,
}

#[derive(Debug)]
pub struct MetaRequest {
	pub uri: String,
	pub meta: MetaInstance,
}

impl Display for TileRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "tile `{}` {} of `{}`", self.tile.id, self.coord, self.uri)?;
		if let Some(query) = &self.query {
			write!(f, " where {}", query.hash())?;
		}
		Ok(())
	}
}

impl Display for MetaRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "meta `{}` of `{}`", self.meta.id, self.uri)
	}
}
