//! Tile coordinates in a quadtree tile pyramid.
//!
//! ```
//! use tessera_core::TileCoord;
//!
//! let coord = TileCoord::new(12, 3, 4);
//! assert_eq!(coord.to_string(), "4/12/3");
//! assert_eq!(coord.tiles_per_axis(), 16);
//! ```

use std::fmt::{self, Debug, Display};

/// Position (`x`, `y`) and zoom level (`z`) of a tile. Immutable once parsed.
#[derive(Eq, PartialEq, Clone, Copy, Hash, Default)]
pub struct TileCoord {
	pub x: u32,
	pub y: u32,
	pub z: u32,
}

impl TileCoord {
	#[must_use]
	pub fn new(x: u32, y: u32, z: u32) -> TileCoord {
		TileCoord { x, y, z }
	}

	/// Number of tiles along one axis at this zoom level, saturating at `u32::MAX + 1`.
	#[must_use]
	pub fn tiles_per_axis(&self) -> u64 {
		1u64 << self.z.min(32)
	}

	/// Serialize to a compact JSON object `{"x":…,"y":…,"z":…}`.
	#[must_use]
	pub fn as_json(&self) -> String {
		format!("{{\"x\":{},\"y\":{},\"z\":{}}}", self.x, self.y, self.z)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}/{}/{}", self.z, self.x, self.y)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.z, self.x, self.y)
	}
}
