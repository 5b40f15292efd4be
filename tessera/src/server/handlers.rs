//! HTTP handlers and small response helpers.
//!
//! `serve_tile` and `serve_meta` answer with
//! - `200` and the generated payload,
//! - `400` and the rendered diagnostics if the request is invalid,
//! - `500` and one error message if the generation failed,
//! - `504` if the generation did not finish in time.

use super::routes::AppState;
use crate::{
	generation::{GenerationResult, meta_fingerprint, tile_fingerprint},
	request::{MetaRequest, TileRequest},
	tile::MIME_JSON,
	validator::{validate_meta_request, validate_tile_request},
};
use axum::{
	body::{Body, Bytes},
	extract::State,
	http::{StatusCode, header},
	response::Response,
};
use serde_json::Value;
use std::future::Future;

pub async fn serve_tile(State(state): State<AppState>, body: Bytes) -> Response<Body> {
	let args = match parse_body(&body) {
		Ok(args) => args,
		Err(response) => return response,
	};
	let request = match validate_tile_request(&args, &state.registry) {
		Ok(request) => request,
		Err(diagnostics) => {
			log::debug!("send 400 for invalid tile request");
			return error_with(StatusCode::BAD_REQUEST, &diagnostics.render());
		}
	};
	log::debug!("handle {request}");

	let fingerprint = tile_fingerprint(&request);
	let mime = request.tile.tile.mime();
	let TileRequest { uri, coord, tile, query } = request;
	let generation = state.coordinator.coordinate(&fingerprint, move || async move {
		tile.tile.create(&uri, &coord, query.as_ref()).await
	});
	respond(&state, &fingerprint, mime, generation).await
}

pub async fn serve_meta(State(state): State<AppState>, body: Bytes) -> Response<Body> {
	let args = match parse_body(&body) {
		Ok(args) => args,
		Err(response) => return response,
	};
	let request = match validate_meta_request(&args, &state.registry) {
		Ok(request) => request,
		Err(diagnostics) => {
			log::debug!("send 400 for invalid meta request");
			return error_with(StatusCode::BAD_REQUEST, &diagnostics.render());
		}
	};
	log::debug!("handle {request}");

	let fingerprint = meta_fingerprint(&request);
	let MetaRequest { uri, meta } = request;
	let generation = state
		.coordinator
		.coordinate(&fingerprint, move || async move { meta.meta.create(&uri).await });
	respond(&state, &fingerprint, MIME_JSON, generation).await
}

fn parse_body(body: &Bytes) -> Result<Value, Response<Body>> {
	serde_json::from_slice(body).map_err(|err| {
		log::debug!("send 400 for unparsable request body: {err}");
		error_with(StatusCode::BAD_REQUEST, &format!("request body is not valid JSON: {err}"))
	})
}

async fn respond(
	state: &AppState,
	fingerprint: &str,
	mime: &str,
	generation: impl Future<Output = GenerationResult>,
) -> Response<Body> {
	match tokio::time::timeout(state.generation_timeout, generation).await {
		Ok(Ok(blob)) => {
			log::debug!("send response for '{fingerprint}'");
			ok_data(blob.as_slice().to_vec(), mime)
		}
		Ok(Err(err)) => {
			log::warn!(
				"send 500 for '{fingerprint}'. Error:\n{}",
				format_error_chain(&err)
			);
			error_with(StatusCode::INTERNAL_SERVER_ERROR, &format!("{err:#}"))
		}
		Err(_) => {
			log::warn!("send 504 for '{fingerprint}' after {:?}", state.generation_timeout);
			error_with(StatusCode::GATEWAY_TIMEOUT, "generation timed out")
		}
	}
}

// --- small helpers -----------------------------------------------------------

pub fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();
	for (i, cause) in err.chain().skip(1).enumerate() {
		if i == 0 {
			result.push_str("\n  Caused by:");
		}
		result.push_str(&format!("\n    {cause}"));
	}
	result
}

fn build(status: StatusCode, mime: &str, body: Vec<u8>) -> Response<Body> {
	let mut response = Response::new(Body::from(body));
	*response.status_mut() = status;
	if let Ok(value) = mime.parse() {
		response.headers_mut().insert(header::CONTENT_TYPE, value);
	}
	response
}

pub fn error_with(status: StatusCode, message: &str) -> Response<Body> {
	build(status, "text/plain; charset=utf-8", message.as_bytes().to_vec())
}

pub fn ok_data(data: Vec<u8>, mime: &str) -> Response<Body> {
	build(StatusCode::OK, mime, data)
}

pub fn ok_json(message: &str) -> Response<Body> {
	ok_data(message.as_bytes().to_vec(), MIME_JSON)
}
