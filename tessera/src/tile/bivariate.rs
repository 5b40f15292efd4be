use crate::{
	backend::{Record, get_number},
	params::Params,
};
use anyhow::{Result, ensure};
use serde_json::Value;
use tessera_core::TileCoord;

/// Size of a tile in pixels along each axis.
pub const TILE_SIZE: f64 = 256.0;

const DEFAULT_MAX: f64 = 4_294_967_296.0;

/// Data space covered by the whole tile pyramid. Tile row 0 lies at `top`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
	pub left: f64,
	pub right: f64,
	pub bottom: f64,
	pub top: f64,
}

impl Default for Extent {
	fn default() -> Self {
		Extent {
			left: 0.0,
			right: DEFAULT_MAX,
			bottom: 0.0,
			top: DEFAULT_MAX,
		}
	}
}

impl Extent {
	pub fn parse(params: &Params) -> Result<Extent> {
		let default = Extent::default();
		let extent = Extent {
			left: params.opt_f64("left")?.unwrap_or(default.left),
			right: params.opt_f64("right")?.unwrap_or(default.right),
			bottom: params.opt_f64("bottom")?.unwrap_or(default.bottom),
			top: params.opt_f64("top")?.unwrap_or(default.top),
		};
		ensure!(extent.left != extent.right, "`left` and `right` must differ");
		ensure!(extent.bottom != extent.top, "`bottom` and `top` must differ");
		Ok(extent)
	}

	/// Maps a data point to pixel coordinates relative to the tile at `coord`.
	///
	/// The result lies outside `[0, 256)` when the point is not within that tile.
	#[must_use]
	pub fn to_tile_pixels(&self, coord: &TileCoord, x: f64, y: f64) -> (f64, f64) {
		let tiles = coord.tiles_per_axis() as f64;
		let width = (self.right - self.left) / tiles;
		let height = (self.top - self.bottom) / tiles;
		let x0 = self.left + f64::from(coord.x) * width;
		let y0 = self.top - f64::from(coord.y) * height;
		((x - x0) / width * TILE_SIZE, (y0 - y) / height * TILE_SIZE)
	}
}

/// Two numeric fields of a record interpreted as a point in an [`Extent`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bivariate {
	pub x_field: String,
	pub y_field: String,
	pub extent: Extent,
}

impl Default for Bivariate {
	fn default() -> Self {
		Bivariate {
			x_field: String::from("pixel.x"),
			y_field: String::from("pixel.y"),
			extent: Extent::default(),
		}
	}
}

impl Bivariate {
	/// Parses `xField`, `yField` and the extent.
	pub fn parse(params: &Value) -> Result<Bivariate> {
		Bivariate::parse_fields(params, "xField", "yField")
	}

	/// Parses the extent and reads the field names from the given keys.
	pub fn parse_fields(params: &Value, x_key: &str, y_key: &str) -> Result<Bivariate> {
		let params = Params::new(params, "tile")?;
		let default = Bivariate::default();
		Ok(Bivariate {
			x_field: params.opt_str(x_key)?.map_or(default.x_field, str::to_owned),
			y_field: params.opt_str(y_key)?.map_or(default.y_field, str::to_owned),
			extent: Extent::parse(&params)?,
		})
	}

	/// Tile-local pixel position of `record`, if it has both fields.
	#[must_use]
	pub fn project(&self, record: &Record, coord: &TileCoord) -> Option<(f64, f64)> {
		let x = get_number(record, &self.x_field)?;
		let y = get_number(record, &self.y_field)?;
		Some(self.extent.to_tile_pixels(coord, x, y))
	}

	/// Tile-local pixel position of `record`, if it falls inside the tile.
	#[must_use]
	pub fn position(&self, record: &Record, coord: &TileCoord) -> Option<(f64, f64)> {
		self
			.project(record, coord)
			.filter(|(px, py)| (0.0..TILE_SIZE).contains(px) && (0.0..TILE_SIZE).contains(py))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn bivariate() -> Bivariate {
		Bivariate::parse(&json!({"xField": "x", "yField": "y", "left": 0, "right": 100, "bottom": 0, "top": 100})).unwrap()
	}

	fn record(x: f64, y: f64) -> Record {
		json!({"x": x, "y": y}).as_object().unwrap().clone()
	}

	#[test]
	fn defaults() -> Result<()> {
		assert_eq!(Bivariate::parse(&json!({}))?, Bivariate::default());
		Ok(())
	}

	#[test]
	fn degenerate_extent() {
		let err = Bivariate::parse(&json!({"left": 1, "right": 1})).unwrap_err();
		assert_eq!(err.to_string(), "`left` and `right` must differ");
	}

	#[rstest]
	#[case(TileCoord::new(0, 0, 0), 50.0, 50.0, Some((128.0, 128.0)))]
	#[case(TileCoord::new(0, 0, 0), 0.0, 100.0, Some((0.0, 0.0)))]
	#[case(TileCoord::new(0, 0, 0), 100.0, 50.0, None)]
	#[case(TileCoord::new(0, 0, 1), 25.0, 75.0, Some((128.0, 128.0)))]
	#[case(TileCoord::new(1, 1, 1), 75.0, 25.0, Some((128.0, 128.0)))]
	#[case(TileCoord::new(1, 0, 1), 75.0, 25.0, None)]
	fn positions(#[case] coord: TileCoord, #[case] x: f64, #[case] y: f64, #[case] expected: Option<(f64, f64)>) {
		assert_eq!(bivariate().position(&record(x, y), &coord), expected);
	}

	#[test]
	fn missing_fields() {
		let record = json!({"x": 1}).as_object().unwrap().clone();
		assert_eq!(bivariate().project(&record, &TileCoord::new(0, 0, 0)), None);
	}
}
