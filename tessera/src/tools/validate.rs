use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::{fs::File, io::BufReader, path::PathBuf, sync::Arc};
use tessera::{
	backend::MemoryBackend,
	generation::{meta_fingerprint, tile_fingerprint},
	registry::Registry,
	validator::{validate_meta_request, validate_tile_request},
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// JSON file containing the request
	#[arg()]
	pub filename: PathBuf,

	/// Validate as a meta request instead of a tile request
	#[arg(long)]
	pub meta: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	println!("{}", check(arguments)?);
	Ok(())
}

fn check(arguments: &Subcommand) -> Result<String> {
	let path = &arguments.filename;
	let file = File::open(path).with_context(|| format!("opening request {path:?}"))?;
	let args: Value = serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing request {path:?}"))?;

	// validation never touches the data
	let registry = Registry::new_default(Arc::new(MemoryBackend::new()));

	let summary = if arguments.meta {
		match validate_meta_request(&args, &registry) {
			Ok(request) => format!("{request}\nfingerprint: {}", meta_fingerprint(&request)),
			Err(diagnostics) => bail!("invalid meta request:\n{}", diagnostics.render()),
		}
	} else {
		match validate_tile_request(&args, &registry) {
			Ok(request) => format!("{request}\nfingerprint: {}", tile_fingerprint(&request)),
			Err(diagnostics) => bail!("invalid tile request:\n{}", diagnostics.render()),
		}
	};
	Ok(summary)
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn check_file(filename: &str, meta: bool) -> Result<String> {
		check(&Subcommand {
			filename: PathBuf::from(filename),
			meta,
		})
	}

	#[test]
	fn valid_tile_request() -> Result<()> {
		assert_eq!(
			check_file("../testdata/tile_request.json", false)?,
			r#"tile `count` 2/1/3 of `points` where ({"equals":["kind","shop"]} or {"range":["size","gte",10.0]})
fingerprint: "points":2/1/3:"count":{"right":256,"top":256,"xField":"x","yField":"y"}:({"equals":["kind","shop"]} or {"range":["size","gte",10.0]})"#
		);
		Ok(())
	}

	#[test]
	fn valid_meta_request() -> Result<()> {
		assert_eq!(
			check_file("../testdata/meta_request.json", true)?,
			"meta `default` of `points`\nfingerprint: \"points\":meta:\"default\":{}"
		);
		Ok(())
	}

	#[test]
	fn invalid_request() {
		let err = check_file("../testdata/invalid_request.json", false).unwrap_err();
		assert_eq!(
			err.to_string(),
			[
				"invalid tile request:",
				"{",
				"  \"uri\": \"points\",",
				"  \"coord\": {",
				"    \"x\": 1,",
				"    \"y\": 2,",
				"    \"z\": ???  <-- error: `coord.z` not found",
				"  },",
				"  \"tile\": {",
				"    \"count\": {}",
				"  }",
				"}",
			]
			.join("\n")
		);
	}

	#[test]
	fn missing_file() {
		let err = check_file("../testdata/does-not-exist.json", false).unwrap_err();
		assert!(err.to_string().starts_with("opening request"));
	}
}
