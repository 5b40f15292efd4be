//! Validation of whole tile and meta requests.
//!
//! Every field is checked even after an earlier one failed, so a single
//! [`Diagnostics`] report covers all problems of a request.

use super::{
	diagnostics::{Annotated, Diagnostics},
	expression::annotate_query,
};
use crate::{
	meta::MetaInstance,
	registry::Registry,
	request::{MetaRequest, TileRequest},
	tile::TileInstance,
};
use anyhow::Result;
use serde_json::{Map, Value};
use tessera_core::TileCoord;

/// The only key of an object naming a type, with its params.
pub(super) fn single_entry(map: &Map<String, Value>) -> Result<(&String, &Value), String> {
	let mut entries = map.iter();
	match (entries.next(), entries.next()) {
		(Some(entry), None) => Ok(entry),
		_ => Err(format!("expected a single key naming the type, found {}", map.len())),
	}
}

fn as_object<'a>(args: &'a Value) -> Result<&'a Map<String, Value>, Diagnostics> {
	args
		.as_object()
		.ok_or_else(|| Diagnostics::new(Annotated::from_value(args).with_error("request is not a JSON object")))
}

fn validate_uri(args: &Map<String, Value>) -> (Annotated, Option<String>) {
	match args.get("uri") {
		None => (Annotated::missing().with_error("`uri` not found"), None),
		Some(Value::String(uri)) if uri.is_empty() => (
			Annotated::from_value(&Value::from("")).with_error("`uri` must not be empty"),
			None,
		),
		Some(Value::String(uri)) => (Annotated::from_value(&Value::from(uri.as_str())), Some(uri.clone())),
		Some(other) => (Annotated::from_value(other).with_error("`uri` not of type `string`"), None),
	}
}

fn validate_coord_component(coord: &Map<String, Value>, key: &str) -> (Annotated, Option<u32>) {
	let Some(value) = coord.get(key) else {
		return (Annotated::missing().with_error(format!("`coord.{key}` not found")), None);
	};
	let annotated = Annotated::from_value(value);
	let Some(n) = value.as_f64() else {
		return (annotated.with_error(format!("`coord.{key}` is not of type `number`")), None);
	};
	if !(0.0..=f64::from(u32::MAX)).contains(&n) {
		return (annotated.with_error(format!("`coord.{key}` is out of range")), None);
	}
	(annotated, Some(n as u32))
}

fn validate_coord(args: &Map<String, Value>) -> (Annotated, Option<TileCoord>) {
	let coord = match args.get("coord") {
		None => return (Annotated::missing().with_error("`coord` not found"), None),
		Some(Value::Object(coord)) => coord,
		Some(other) => {
			return (
				Annotated::from_value(other).with_error("`coord` is not of correct type"),
				None,
			);
		}
	};
	let (ax, x) = validate_coord_component(coord, "x");
	let (ay, y) = validate_coord_component(coord, "y");
	let (az, z) = validate_coord_component(coord, "z");
	let annotated = Annotated::object(vec![("x".into(), ax), ("y".into(), ay), ("z".into(), az)]);
	let coord = match (x, y, z) {
		(Some(x), Some(y), Some(z)) => Some(TileCoord::new(x, y, z)),
		_ => None,
	};
	(annotated, coord)
}

/// Validates `{"<key>": {"<type>": {params}}}` and creates the named type.
fn validate_typed<T>(
	args: &Map<String, Value>,
	key: &str,
	create: impl FnOnce(&str, &Value) -> Result<T>,
) -> (Annotated, Option<T>) {
	let map = match args.get(key) {
		None => return (Annotated::missing().with_error(format!("`{key}` not found")), None),
		Some(Value::Object(map)) => map,
		Some(other) => {
			return (
				Annotated::from_value(other).with_error(format!("`{key}` is not of correct type")),
				None,
			);
		}
	};
	let (id, params) = match single_entry(map) {
		Ok(entry) => entry,
		Err(message) => return (Annotated::from_value(&Value::Object(map.clone())).with_error(message), None),
	};
	match create(id, params) {
		Ok(instance) => (
			Annotated::object(vec![(id.clone(), Annotated::from_value(params))]),
			Some(instance),
		),
		Err(err) => (
			Annotated::object(vec![(
				id.clone(),
				Annotated::from_value(params).with_error(format!("{err:#}")),
			)]),
			None,
		),
	}
}

pub fn validate_tile_request(args: &Value, registry: &Registry) -> Result<TileRequest, Diagnostics> {
	let args = as_object(args)?;

	let (a_uri, uri) = validate_uri(args);
	let (a_coord, coord) = validate_coord(args);
	let (a_tile, tile): (Annotated, Option<TileInstance>) =
		validate_typed(args, "tile", |id, params| registry.get_tile(id, params));

	let mut entries = vec![
		("uri".to_string(), a_uri),
		("coord".to_string(), a_coord),
		("tile".to_string(), a_tile),
	];
	let query = args.get("query").map(|raw| {
		let (a_query, query) = annotate_query(raw, registry);
		entries.push(("query".to_string(), a_query));
		query
	});

	let root = Annotated::object(entries);
	match (uri, coord, tile, query) {
		(Some(uri), Some(coord), Some(tile), None) if !root.has_errors() => Ok(TileRequest {
			uri,
			coord,
			tile,
			query: None,
		}),
		(Some(uri), Some(coord), Some(tile), Some(Some(query))) if !root.has_errors() => Ok(TileRequest {
			uri,
			coord,
			tile,
			query: Some(query),
		}),
		_ => Err(Diagnostics::new(root)),
	}
}

pub fn validate_meta_request(args: &Value, registry: &Registry) -> Result<MetaRequest, Diagnostics> {
	let args = as_object(args)?;

	let (a_uri, uri) = validate_uri(args);
	let (a_meta, meta): (Annotated, Option<MetaInstance>) =
		validate_typed(args, "meta", |id, params| registry.get_meta(id, params));

	let root = Annotated::object(vec![("uri".to_string(), a_uri), ("meta".to_string(), a_meta)]);
	match (uri, meta) {
		(Some(uri), Some(meta)) if !root.has_errors() => Ok(MetaRequest { uri, meta }),
		_ => Err(Diagnostics::new(root)),
	}
}
