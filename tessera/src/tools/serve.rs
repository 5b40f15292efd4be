use anyhow::Result;
use std::path::PathBuf;
use tessera::{
	config::{Config, DatasetConfig},
	server::TileServer,
};
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Path to a configuration file (YAML format) to configure the server and its datasets.
	/// Command line arguments will override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8080
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Load a JSON dataset and serve it under a uri, given as "uri=path".
	/// Can be repeated.
	#[arg(short = 'd', long = "dataset", value_name = "URI=PATH", verbatim_doc_comment, display_order = 1)]
	pub datasets: Vec<DatasetConfig>,

	/// How long a request waits for its generation, in milliseconds. Default: 30000
	#[arg(long, display_order = 2)]
	pub generation_timeout: Option<u64>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = if let Some(config_path) = &arguments.config {
		Config::from_path(config_path)?
	} else {
		Config::default()
	};

	config.server.override_optional_ip(&arguments.ip);
	config.server.override_optional_port(&arguments.port);
	config
		.server
		.override_optional_generation_timeout(&arguments.generation_timeout);
	config.datasets.extend(arguments.datasets.iter().cloned());

	let mut server = TileServer::from_config(&config)?;

	for id in server.state().registry.tile_ids() {
		eprintln!("   tile type  {id}");
	}
	for dataset in &config.datasets {
		eprintln!("   dataset    {:20}  <-  {:?}", dataset.uri, dataset.path);
	}

	server.start().await?;

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		loop {
			sleep(Duration::from_secs(60)).await;
		}
	}

	server.stop().await;
	Ok(())
}
