//! Meta types describe a whole dataset rather than a single tile.

mod default;

pub use default::DefaultMeta;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Debug, sync::Arc};
use tessera_core::Blob;

#[async_trait]
pub trait Meta: Debug + Send + Sync {
	fn parse(&mut self, params: &Value) -> Result<()>;

	async fn create(&self, uri: &str) -> Result<Blob>;
}

/// A parsed meta type together with its registered name and parameters.
#[derive(Debug, Clone)]
pub struct MetaInstance {
	pub id: String,
	pub params: Value,
	pub meta: Arc<dyn Meta>,
}

impl MetaInstance {
	#[must_use]
	pub fn params_hash(&self) -> String {
		self.params.to_string()
	}
}
