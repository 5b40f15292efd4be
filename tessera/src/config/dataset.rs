use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::{
	path::{Path, PathBuf},
	str::FromStr,
};

/// A JSON dataset file served under `uri`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
	pub uri: String,
	pub path: PathBuf,
}

impl DatasetConfig {
	/// Makes a relative `path` relative to `base` instead of the working directory.
	pub fn resolve_paths(&mut self, base: &Path) {
		if self.path.is_relative() {
			self.path = base.join(&self.path);
		}
	}
}

impl From<(&str, &str)> for DatasetConfig {
	fn from((uri, path): (&str, &str)) -> Self {
		DatasetConfig {
			uri: uri.to_owned(),
			path: PathBuf::from(path),
		}
	}
}

/// Parses the command line form `uri=path`.
impl FromStr for DatasetConfig {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		let (uri, path) = s
			.split_once('=')
			.ok_or_else(|| anyhow!("dataset must be given as `uri=path`, got '{s}'"))?;
		if uri.is_empty() || path.is_empty() {
			return Err(anyhow!("dataset must be given as `uri=path`, got '{s}'"));
		}
		Ok(DatasetConfig::from((uri, path)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_cli_form() -> Result<()> {
		assert_eq!(
			"taxi=data/taxi.json".parse::<DatasetConfig>()?,
			DatasetConfig::from(("taxi", "data/taxi.json"))
		);
		assert!("taxi".parse::<DatasetConfig>().is_err());
		assert!("=a.json".parse::<DatasetConfig>().is_err());
		Ok(())
	}

	#[test]
	fn resolve_relative_paths() {
		let mut relative = DatasetConfig::from(("a", "data/a.json"));
		relative.resolve_paths(Path::new("/etc/tessera"));
		assert_eq!(relative.path, PathBuf::from("/etc/tessera/data/a.json"));

		let mut absolute = DatasetConfig::from(("a", "/data/a.json"));
		absolute.resolve_paths(Path::new("/etc/tessera"));
		assert_eq!(absolute.path, PathBuf::from("/data/a.json"));
	}
}
