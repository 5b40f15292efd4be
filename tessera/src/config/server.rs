use serde::Deserialize;
use std::time::Duration;

/// Default time a request waits for its generation, in milliseconds.
pub const DEFAULT_GENERATION_TIMEOUT: u64 = 30_000;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP to bind to.
	pub ip: Option<String>,

	/// TCP port to bind to.
	pub port: Option<u16>,

	/// How long a request waits for its generation, in milliseconds.
	pub generation_timeout: Option<u64>,
}

impl ServerConfig {
	pub fn override_optional_ip(&mut self, ip: &Option<String>) {
		if ip.is_some() {
			self.ip = ip.clone();
		}
	}

	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if port.is_some() {
			self.port = *port;
		}
	}

	pub fn override_optional_generation_timeout(&mut self, generation_timeout: &Option<u64>) {
		if generation_timeout.is_some() {
			self.generation_timeout = *generation_timeout;
		}
	}

	#[must_use]
	pub fn generation_timeout(&self) -> Duration {
		Duration::from_millis(self.generation_timeout.unwrap_or(DEFAULT_GENERATION_TIMEOUT))
	}
}
