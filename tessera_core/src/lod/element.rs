use super::morton;
use crate::io::{ValueReaderSlice, ValueWriter};
use anyhow::{Result, ensure};
use byteorder::LittleEndian;
use std::fmt::Debug;

/// An element that can be sorted and encoded into an LOD payload.
pub trait LodElement: Copy + Debug + PartialEq {
	/// Number of `f32` components written per element.
	const COMPONENTS: usize;

	/// Number of bytes one encoded element occupies.
	const BYTES: usize = Self::COMPONENTS * 4;

	/// Tile-local point used to compute the spatial sort key.
	fn anchor(&self) -> (f32, f32);

	fn write(&self, writer: &mut dyn ValueWriter<LittleEndian>) -> Result<()>;

	fn read(reader: &mut ValueReaderSlice<'_, LittleEndian>) -> Result<Self>;

	/// Morton code of the anchor point.
	fn morton(&self) -> u32 {
		let (x, y) = self.anchor();
		morton(x, y)
	}

	/// Builds elements from a flat component array, `COMPONENTS` values per element.
	fn from_flat(values: &[f32]) -> Result<Vec<Self>> {
		ensure!(
			values.len() % Self::COMPONENTS == 0,
			"flat array of length {} is not a multiple of {}",
			values.len(),
			Self::COMPONENTS
		);
		let bytes = values
			.iter()
			.flat_map(|v| v.to_le_bytes())
			.collect::<Vec<u8>>();
		let mut reader = ValueReaderSlice::new_le(&bytes);
		(0..values.len() / Self::COMPONENTS)
			.map(|_| Self::read(&mut reader))
			.collect()
	}
}

/// A tile-local point with a weight, typically a bucket or cluster id.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex {
	pub x: f32,
	pub y: f32,
	pub weight: f32,
}

impl Vertex {
	#[must_use]
	pub fn new(x: f32, y: f32, weight: f32) -> Vertex {
		Vertex { x, y, weight }
	}
}

/// An edge between two weighted vertices. It is sorted by its first vertex.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Edge {
	pub a: Vertex,
	pub b: Vertex,
}

impl Edge {
	#[must_use]
	pub fn new(a: Vertex, b: Vertex) -> Edge {
		Edge { a, b }
	}
}

impl LodElement for Edge {
	const COMPONENTS: usize = 6;

	fn anchor(&self) -> (f32, f32) {
		(self.a.x, self.a.y)
	}

	fn write(&self, writer: &mut dyn ValueWriter<LittleEndian>) -> Result<()> {
		writer.write_f32_slice(&[self.a.x, self.a.y, self.a.weight, self.b.x, self.b.y, self.b.weight])
	}

	fn read(reader: &mut ValueReaderSlice<'_, LittleEndian>) -> Result<Self> {
		let a = Vertex::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?);
		let b = Vertex::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?);
		Ok(Edge { a, b })
	}
}

/// A plain tile-local point.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
	pub x: f32,
	pub y: f32,
}

impl Point {
	#[must_use]
	pub fn new(x: f32, y: f32) -> Point {
		Point { x, y }
	}
}

impl LodElement for Point {
	const COMPONENTS: usize = 2;

	fn anchor(&self) -> (f32, f32) {
		(self.x, self.y)
	}

	fn write(&self, writer: &mut dyn ValueWriter<LittleEndian>) -> Result<()> {
		writer.write_f32(self.x)?;
		writer.write_f32(self.y)
	}

	fn read(reader: &mut ValueReaderSlice<'_, LittleEndian>) -> Result<Self> {
		Ok(Point::new(reader.read_f32()?, reader.read_f32()?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edges_from_flat() -> Result<()> {
		let edges = Edge::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
		assert_eq!(
			edges,
			vec![Edge::new(Vertex::new(1.0, 2.0, 3.0), Vertex::new(4.0, 5.0, 6.0))]
		);
		assert_eq!(edges[0].anchor(), (1.0, 2.0));
		assert_eq!(Edge::BYTES, 24);
		Ok(())
	}

	#[test]
	fn points_from_flat() -> Result<()> {
		let points = Point::from_flat(&[1.0, 2.0, 3.0, 4.0])?;
		assert_eq!(points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
		assert_eq!(Point::BYTES, 8);
		Ok(())
	}

	#[test]
	fn from_flat_rejects_partial_elements() {
		let err = Edge::from_flat(&[1.0, 2.0, 3.0]).unwrap_err().to_string();
		assert_eq!(err, "flat array of length 3 is not a multiple of 6");
	}
}
