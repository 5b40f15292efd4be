//! Router composition. Lifecycle concerns live in `tile_server`.

use super::handlers::{ok_json, serve_meta, serve_tile};
use crate::{generation::GenerationCoordinator, registry::Registry};
use axum::{
	Router,
	routing::{get, post},
};
use std::{sync::Arc, time::Duration};

/// Shared by all handlers.
#[derive(Clone)]
pub struct AppState {
	pub registry: Arc<Registry>,
	pub coordinator: Arc<GenerationCoordinator>,
	pub generation_timeout: Duration,
}

impl AppState {
	pub fn new(registry: Registry, generation_timeout: Duration) -> AppState {
		AppState {
			registry: Arc::new(registry),
			coordinator: Arc::new(GenerationCoordinator::new()),
			generation_timeout,
		}
	}
}

/// Attach `POST /tile` and `POST /meta`.
pub fn add_generation_routes_to_app(app: Router, state: AppState) -> Router {
	let generation_app = Router::new()
		.route("/tile", post(serve_tile))
		.route("/meta", post(serve_meta))
		.with_state(state);
	app.merge(generation_app)
}

/// Attach `GET /api/tiles`, `/api/metas` and `/api/queries`, listing the registered type names.
pub fn add_api_to_app(app: Router, registry: &Registry) -> Router {
	let list = |ids: Vec<String>| {
		let json = serde_json::Value::from(ids).to_string();
		move || async move { ok_json(&json) }
	};
	let api_app = Router::new()
		.route("/api/tiles", get(list(registry.tile_ids())))
		.route("/api/metas", get(list(registry.meta_ids())))
		.route("/api/queries", get(list(registry.query_ids())));
	app.merge(api_app)
}

/// The complete router of the server.
pub fn build_router(state: AppState) -> Router {
	let mut router = Router::new().route("/status", get(|| async { "ready!" }));
	router = add_api_to_app(router, &state.registry);
	add_generation_routes_to_app(router, state)
}
