use super::{DatasetConfig, ServerConfig};
use crate::backend::MemoryBackend;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Datasets to load into memory
	#[serde(default)]
	pub datasets: Vec<DatasetConfig>,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a config file. Dataset paths are resolved relative to the file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config {path:?}"))?;
		let mut config = Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config {path:?}"))?;
		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		for dataset in &mut self.datasets {
			dataset.resolve_paths(base);
		}
	}

	/// Loads every configured dataset.
	pub fn load_backend(&self) -> Result<MemoryBackend> {
		let mut backend = MemoryBackend::new();
		for dataset in &self.datasets {
			backend.load_dataset(&dataset.uri, &dataset.path)?;
		}
		Ok(backend)
	}
}
