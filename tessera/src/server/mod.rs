//! HTTP surface of Tessera.
//!
//! - `handlers` validate requests and hand them to the generation coordinator.
//! - `routes` composes handlers into an axum `Router`.
//! - `tile_server` owns the lifecycle: binding, serving and graceful shutdown.

mod handlers;
mod routes;
mod tile_server;

pub use routes::AppState;
pub use tile_server::TileServer;
