//! Server lifecycle: configuration ingestion, binding, serving and graceful shutdown.

use super::routes::{AppState, build_router};
use crate::{config::Config, registry::Registry};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// Start and stop are idempotent: starting twice restarts, stopping twice is a no-op.
pub struct TileServer {
	ip: String,
	port: u16,
	state: AppState,
	exit_signal: Option<oneshot::Sender<()>>,
	join: Option<JoinHandle<()>>,
}

impl TileServer {
	pub fn new(ip: &str, port: u16, registry: Registry, generation_timeout: Duration) -> TileServer {
		TileServer {
			ip: ip.to_owned(),
			port,
			state: AppState::new(registry, generation_timeout),
			exit_signal: None,
			join: None,
		}
	}

	/// Loads every configured dataset and registers the default types against them.
	pub fn from_config(config: &Config) -> Result<TileServer> {
		let backend = config.load_backend().context("loading datasets")?;
		Ok(TileServer::new(
			config.server.ip.as_deref().unwrap_or("0.0.0.0"),
			config.server.port.unwrap_or(8080),
			Registry::new_default(Arc::new(backend)),
			config.server.generation_timeout(),
		))
	}

	#[must_use]
	pub fn state(&self) -> &AppState {
		&self.state
	}

	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		log::info!("starting server");

		let router = build_router(self.state.clone());

		let addr = format!("{}:{}", self.ip, self.port);
		log::info!("server binding on {addr}");

		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding to {addr}"))?;
		let (tx, rx) = oneshot::channel::<()>();

		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		self.join = Some(handle);

		Ok(())
	}

	/// Triggers graceful shutdown and waits for the server task, at most 10 seconds.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");

		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}

		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(Duration::from_secs(10), handle).await {
				Ok(Err(join_err)) => log::warn!("server task join error: {join_err}"),
				Ok(Ok(())) => {}
				Err(_) => log::warn!("server task did not shutdown within timeout; continuing"),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{DatasetConfig, ServerConfig};
	use tokio::{
		io::{AsyncReadExt, AsyncWriteExt},
		net::TcpStream,
	};

	const IP: &str = "127.0.0.1";

	async fn http(port: u16, request: &str) -> String {
		let mut stream = TcpStream::connect((IP, port)).await.unwrap();
		stream.write_all(request.as_bytes()).await.unwrap();
		let mut response = String::new();
		stream.read_to_string(&mut response).await.unwrap();
		response
	}

	#[tokio::test]
	async fn serve_over_tcp() -> Result<()> {
		let config = Config {
			server: ServerConfig {
				ip: Some(IP.to_string()),
				port: Some(50_611),
				generation_timeout: Some(5_000),
			},
			datasets: vec![DatasetConfig::from(("points", "../testdata/points.json"))],
		};
		let mut server = TileServer::from_config(&config)?;
		assert_eq!(server.state().generation_timeout, Duration::from_secs(5));
		server.start().await?;

		let response = http(50_611, "GET /status HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await;
		assert!(response.starts_with("HTTP/1.1 200 OK"));
		assert!(response.ends_with("ready!"));

		let body = r#"{"uri":"points","coord":{"x":0,"y":0,"z":0},"tile":{"count":{"xField":"x","yField":"y","right":256,"top":256}}}"#;
		let request = format!(
			"POST /tile HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
			body.len()
		);
		let response = http(50_611, &request).await;
		assert!(response.starts_with("HTTP/1.1 200 OK"));
		assert!(response.ends_with(r#"{"count":12}"#));

		server.stop().await;
		server.stop().await;
		Ok(())
	}

	#[test]
	fn missing_dataset_fails() {
		let config = Config {
			server: ServerConfig::default(),
			datasets: vec![DatasetConfig::from(("a", "../testdata/does-not-exist.json"))],
		};
		let err = TileServer::from_config(&config).err().unwrap();
		assert_eq!(err.to_string(), "loading datasets");
	}
}
