use super::Record;
use crate::query::QueryExpression;
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::{collections::HashMap, fs::File, io::BufReader, path::Path, sync::Arc};

/// An immutable list of records addressed by a URI.
#[derive(Debug, Default)]
pub struct Dataset {
	records: Vec<Record>,
}

impl Dataset {
	#[must_use]
	pub fn new(records: Vec<Record>) -> Dataset {
		Dataset { records }
	}

	/// Builds a dataset from a JSON array of objects.
	pub fn from_value(value: Value) -> Result<Dataset> {
		let Value::Array(items) = value else {
			bail!("dataset must be a JSON array of objects")
		};
		let records = items
			.into_iter()
			.enumerate()
			.map(|(index, item)| match item {
				Value::Object(record) => Ok(record),
				other => Err(anyhow!("record {index} is not an object: {other}")),
			})
			.collect::<Result<Vec<Record>>>()?;
		Ok(Dataset { records })
	}

	pub fn from_path(path: &Path) -> Result<Dataset> {
		let file = File::open(path).with_context(|| format!("opening dataset {path:?}"))?;
		let value: Value =
			serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing dataset {path:?}"))?;
		Dataset::from_value(value).with_context(|| format!("reading dataset {path:?}"))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.records.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn records(&self) -> impl Iterator<Item = &Record> {
		self.records.iter()
	}

	/// Records matching `query`; all records if there is no query.
	pub fn filter<'a>(&'a self, query: Option<&'a QueryExpression>) -> impl Iterator<Item = &'a Record> + 'a {
		self
			.records
			.iter()
			.filter(move |record| query.is_none_or(|q| q.matches(record)))
	}
}

/// Holds every dataset the server can generate tiles from.
#[derive(Debug, Default)]
pub struct MemoryBackend {
	datasets: HashMap<String, Arc<Dataset>>,
}

impl MemoryBackend {
	#[must_use]
	pub fn new() -> MemoryBackend {
		MemoryBackend::default()
	}

	pub fn add_dataset(&mut self, uri: &str, dataset: Dataset) -> Result<()> {
		if self.datasets.contains_key(uri) {
			bail!("dataset `{uri}` is defined more than once")
		}
		log::info!("add dataset: uri='{uri}', records={}", dataset.len());
		self.datasets.insert(uri.to_owned(), Arc::new(dataset));
		Ok(())
	}

	pub fn load_dataset(&mut self, uri: &str, path: &Path) -> Result<()> {
		self.add_dataset(uri, Dataset::from_path(path)?)
	}

	pub fn dataset(&self, uri: &str) -> Result<Arc<Dataset>> {
		self
			.datasets
			.get(uri)
			.cloned()
			.ok_or_else(|| anyhow!("dataset `{uri}` not found"))
	}

	/// URIs of all datasets, sorted.
	#[must_use]
	pub fn uris(&self) -> Vec<String> {
		let mut uris: Vec<String> = self.datasets.keys().cloned().collect();
		uris.sort();
		uris
	}
}
