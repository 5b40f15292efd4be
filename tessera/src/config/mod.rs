//! Server configuration, read from a YAML file and overridden from the command line.
//!
//! ```yaml
//! server:
//!   ip: 0.0.0.0
//!   port: 8080
//!   generation_timeout: 30000
//! datasets:
//!   - uri: taxi
//!     path: data/taxi.json
//! ```

mod dataset;
mod main;
mod server;

pub use dataset::DatasetConfig;
pub use main::Config;
pub use server::ServerConfig;
