//! Lookup of tile, meta and query types by name.
//!
//! The registry holds one constructor per name. A request names a type and
//! passes its parameters; the registry creates a fresh instance and lets it
//! parse them.

use crate::{
	backend::MemoryBackend,
	meta::{DefaultMeta, Meta, MetaInstance},
	query::{Equals, Exists, Has, Prefix, Query, Range},
	tile::{CountTile, EdgeTile, MicroTile, TargetTermsTile, Tile, TileInstance, TopTermsTile},
};
use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::{
	collections::HashMap,
	fmt::{self, Debug},
	sync::Arc,
};

type TileCtor = Box<dyn Fn() -> Box<dyn Tile> + Send + Sync>;
type MetaCtor = Box<dyn Fn() -> Box<dyn Meta> + Send + Sync>;
type QueryCtor = Box<dyn Fn(&Value) -> Result<Arc<dyn Query>> + Send + Sync>;

#[derive(Default)]
pub struct Registry {
	tiles: HashMap<String, TileCtor>,
	metas: HashMap<String, MetaCtor>,
	queries: HashMap<String, QueryCtor>,
}

impl Registry {
	#[must_use]
	pub fn new_empty() -> Registry {
		Registry::default()
	}

	/// All built-in types, generating from `backend`.
	#[must_use]
	pub fn new_default(backend: Arc<MemoryBackend>) -> Registry {
		let mut registry = Registry::new_empty();

		let b = Arc::clone(&backend);
		registry.register_tile("count", move || Box::new(CountTile::new(Arc::clone(&b))));
		let b = Arc::clone(&backend);
		registry.register_tile("micro", move || Box::new(MicroTile::new(Arc::clone(&b))));
		let b = Arc::clone(&backend);
		registry.register_tile("edge", move || Box::new(EdgeTile::new(Arc::clone(&b))));
		let b = Arc::clone(&backend);
		registry.register_tile("top-terms", move || Box::new(TopTermsTile::new(Arc::clone(&b))));
		let b = Arc::clone(&backend);
		registry.register_tile("target-terms", move || Box::new(TargetTermsTile::new(Arc::clone(&b))));

		registry.register_meta("default", move || Box::new(DefaultMeta::new(Arc::clone(&backend))));

		registry.register_query("range", |p| Ok(Arc::new(Range::parse(p)?)));
		registry.register_query("has", |p| Ok(Arc::new(Has::parse(p)?)));
		registry.register_query("equals", |p| Ok(Arc::new(Equals::parse(p)?)));
		registry.register_query("exists", |p| Ok(Arc::new(Exists::parse(p)?)));
		registry.register_query("prefix", |p| Ok(Arc::new(Prefix::parse(p)?)));

		registry
	}

	pub fn register_tile(&mut self, id: &str, ctor: impl Fn() -> Box<dyn Tile> + Send + Sync + 'static) {
		self.tiles.insert(id.to_owned(), Box::new(ctor));
	}

	pub fn register_meta(&mut self, id: &str, ctor: impl Fn() -> Box<dyn Meta> + Send + Sync + 'static) {
		self.metas.insert(id.to_owned(), Box::new(ctor));
	}

	pub fn register_query(
		&mut self,
		id: &str,
		ctor: impl Fn(&Value) -> Result<Arc<dyn Query>> + Send + Sync + 'static,
	) {
		self.queries.insert(id.to_owned(), Box::new(ctor));
	}

	/// Creates the tile type `id` and parses `params` into it.
	pub fn get_tile(&self, id: &str, params: &Value) -> Result<TileInstance> {
		let ctor = self
			.tiles
			.get(id)
			.ok_or_else(|| anyhow!("tile type `{id}` is not recognized"))?;
		let mut tile = ctor();
		tile
			.parse(params)
			.with_context(|| format!("parsing params of tile type `{id}`"))?;
		Ok(TileInstance {
			id: id.to_owned(),
			params: params.clone(),
			tile: Arc::from(tile),
		})
	}

	pub fn get_meta(&self, id: &str, params: &Value) -> Result<MetaInstance> {
		let ctor = self
			.metas
			.get(id)
			.ok_or_else(|| anyhow!("meta type `{id}` is not recognized"))?;
		let mut meta = ctor();
		meta
			.parse(params)
			.with_context(|| format!("parsing params of meta type `{id}`"))?;
		Ok(MetaInstance {
			id: id.to_owned(),
			params: params.clone(),
			meta: Arc::from(meta),
		})
	}

	pub fn get_query(&self, id: &str, params: &Value) -> Result<Arc<dyn Query>> {
		let ctor = self
			.queries
			.get(id)
			.ok_or_else(|| anyhow!("query type `{id}` is not recognized"))?;
		ctor(params).with_context(|| format!("parsing params of query type `{id}`"))
	}

	#[must_use]
	pub fn tile_ids(&self) -> Vec<String> {
		sorted_keys(&self.tiles)
	}

	#[must_use]
	pub fn meta_ids(&self) -> Vec<String> {
		sorted_keys(&self.metas)
	}

	#[must_use]
	pub fn query_ids(&self) -> Vec<String> {
		sorted_keys(&self.queries)
	}
}

fn sorted_keys<T>(map: &HashMap<String, T>) -> Vec<String> {
	let mut keys: Vec<String> = map.keys().cloned().collect();
	keys.sort();
	keys
}

impl Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("tiles", &self.tile_ids())
			.field("metas", &self.meta_ids())
			.field("queries", &self.query_ids())
			.finish()
	}
}
