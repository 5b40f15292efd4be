//! This module provides the [`Blob`] struct, a wrapper around [`Vec<u8>`] used for
//! generated tile payloads.
//!
//! # Examples
//!
//! ```rust
//! use tessera_core::Blob;
//!
//! let blob = Blob::from(vec![0, 1, 2, 3]);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.as_slice(), &[0, 1, 2, 3]);
//!
//! let text = Blob::from("{\"count\":12}");
//! assert_eq!(text.as_str(), "{\"count\":12}");
//! ```

use itertools::Itertools;
use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`] holding an encoded tile or meta payload.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Blob(Vec<u8>);

#[allow(dead_code)]
impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns the whole blob as a byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_slice()
	}

	/// Consumes the blob and returns the underlying vector.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Interprets the blob as UTF-8 text. Invalid UTF-8 yields an empty string.
	#[must_use]
	pub fn as_str(&self) -> &str {
		std::str::from_utf8(&self.0).unwrap_or("")
	}

	/// Hexadecimal representation, used by the `Debug` output.
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.take(32)
			.map(|b| format!("{b:02x}"))
			.join(" ")
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
	}
}
