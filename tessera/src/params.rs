//! Typed access to the JSON parameter objects of tiles, metas and queries.

use anyhow::{Result, anyhow, bail};
use serde_json::{Map, Value};

/// A borrowed parameter object together with the kind of thing it configures,
/// used to phrase error messages such as "`field` parameter missing from query params".
#[derive(Clone, Copy, Debug)]
pub struct Params<'a> {
	map: &'a Map<String, Value>,
	kind: &'static str,
}

impl<'a> Params<'a> {
	pub fn new(value: &'a Value, kind: &'static str) -> Result<Params<'a>> {
		match value {
			Value::Object(map) => Ok(Params { map, kind }),
			_ => bail!("{kind} params must be an object"),
		}
	}

	pub fn get(&self, key: &str) -> Option<&'a Value> {
		self.map.get(key).filter(|v| !v.is_null())
	}

	pub fn value(&self, key: &str) -> Result<&'a Value> {
		self.get(key).ok_or_else(|| self.missing(key))
	}

	pub fn str(&self, key: &str) -> Result<&'a str> {
		self
			.value(key)?
			.as_str()
			.ok_or_else(|| anyhow!("`{key}` parameter is not of type `string`"))
	}

	pub fn opt_str(&self, key: &str) -> Result<Option<&'a str>> {
		self.get(key).map(|_| self.str(key)).transpose()
	}

	pub fn f64(&self, key: &str) -> Result<f64> {
		self
			.value(key)?
			.as_f64()
			.ok_or_else(|| anyhow!("`{key}` parameter is not of type `number`"))
	}

	pub fn opt_f64(&self, key: &str) -> Result<Option<f64>> {
		self.get(key).map(|_| self.f64(key)).transpose()
	}

	pub fn u32(&self, key: &str) -> Result<u32> {
		let value = self.value(key)?;
		value
			.as_u64()
			.and_then(|v| u32::try_from(v).ok())
			.ok_or_else(|| anyhow!("`{key}` parameter is not a non-negative integer"))
	}

	pub fn opt_u32(&self, key: &str) -> Result<Option<u32>> {
		self.get(key).map(|_| self.u32(key)).transpose()
	}

	pub fn array(&self, key: &str) -> Result<&'a Vec<Value>> {
		self
			.value(key)?
			.as_array()
			.ok_or_else(|| anyhow!("`{key}` parameter is not of type `array`"))
	}

	fn missing(&self, key: &str) -> anyhow::Error {
		anyhow!("`{key}` parameter missing from {} params", self.kind)
	}
}
