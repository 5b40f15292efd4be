use super::{LodElement, MAX_MORTON};
use crate::{
	Blob,
	io::{ValueReaderSlice, ValueWriter, ValueWriterBlob},
};
use anyhow::{Context, Result, ensure};
use byteorder::LittleEndian;
use std::ops::Range;

/// Deepest supported LOD: `4^8` partitions exhaust the 16 bit Morton space.
pub const MAX_LOD: u32 = 8;

const HEADER_BYTES: usize = 8;

/// Stably sorts `elements` by Morton code and computes one byte offset per partition.
///
/// `offsets[p]` is the byte offset of the first element in partition `p`. Empty
/// partitions inherit the offset of the next non-empty one, trailing empty
/// partitions the total byte length, so the offsets never decrease.
pub fn sort_by_lod<T: LodElement>(elements: &[T], lod: u32) -> Result<(Vec<T>, Vec<u32>)> {
	ensure!(lod <= MAX_LOD, "lod ({lod}) must be <= {MAX_LOD}");

	let mut keyed: Vec<(u32, T)> = elements.iter().map(|e| (e.morton(), *e)).collect();
	keyed.sort_by_key(|(code, _)| *code);

	let total_bytes = u32::try_from(keyed.len() * T::BYTES).context("too many elements for a LOD payload")?;
	let partitions = 1usize << (2 * lod);
	let stride = MAX_MORTON / partitions as u32;

	let mut firsts: Vec<Option<u32>> = vec![None; partitions];
	for (index, (code, _)) in keyed.iter().enumerate().rev() {
		firsts[(code / stride) as usize] = Some((index * T::BYTES) as u32);
	}

	let mut next = total_bytes;
	let mut offsets: Vec<u32> = firsts
		.iter()
		.rev()
		.map(|first| {
			if let Some(offset) = first {
				next = *offset;
			}
			next
		})
		.collect();
	offsets.reverse();

	let sorted = keyed.into_iter().map(|(_, e)| e).collect();
	Ok((sorted, offsets))
}

/// Sorts `elements` with [`sort_by_lod`] and serializes them into the LOD layout.
///
/// Identical input yields byte-identical output.
pub fn encode_lod<T: LodElement>(elements: &[T], lod: u32) -> Result<Blob> {
	let (sorted, offsets) = sort_by_lod(elements, lod)?;

	let element_bytes = sorted.len() * T::BYTES;
	let offset_bytes = offsets.len() * 4;
	let mut writer = ValueWriterBlob::<LittleEndian>::with_capacity(HEADER_BYTES + element_bytes + offset_bytes);

	writer.write_u32(element_bytes as u32)?;
	writer.write_u32(offset_bytes as u32)?;
	for element in &sorted {
		element.write(&mut writer)?;
	}
	writer.write_u32_slice(&offsets)?;

	log::trace!(
		"encoded {} elements with lod {lod} into {} bytes",
		sorted.len(),
		writer.position()?
	);

	Ok(writer.into_blob())
}

/// The fixed header of an LOD payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LodHeader {
	pub element_bytes: u32,
	pub offset_bytes: u32,
}

impl LodHeader {
	pub fn read(data: &[u8]) -> Result<LodHeader> {
		let mut reader = ValueReaderSlice::new_le(data);
		let header = LodHeader {
			element_bytes: reader.read_u32().context("reading element length")?,
			offset_bytes: reader.read_u32().context("reading offset length")?,
		};
		ensure!(
			data.len() == HEADER_BYTES + header.element_bytes as usize + header.offset_bytes as usize,
			"payload length {} does not match header {header:?}",
			data.len()
		);
		ensure!(
			header.offset_bytes % 4 == 0,
			"offset length {} is not a multiple of 4",
			header.offset_bytes
		);
		header.lod()?;
		Ok(header)
	}

	/// Number of encoded elements of type `T`.
	pub fn element_count<T: LodElement>(&self) -> Result<usize> {
		let bytes = self.element_bytes as usize;
		ensure!(
			bytes % T::BYTES == 0,
			"element length {bytes} is not a multiple of {}",
			T::BYTES
		);
		Ok(bytes / T::BYTES)
	}

	/// LOD recovered from the number of partitions (`4^lod`).
	pub fn lod(&self) -> Result<u32> {
		let partitions = self.offset_bytes / 4;
		ensure!(
			partitions.is_power_of_two() && partitions.trailing_zeros() % 2 == 0,
			"partition count {partitions} is not a power of 4"
		);
		Ok(partitions.trailing_zeros() / 2)
	}
}

/// Decodes a payload produced by [`encode_lod`] back into sorted elements and offsets.
pub fn decode_lod<T: LodElement>(data: &[u8]) -> Result<(Vec<T>, Vec<u32>)> {
	let header = LodHeader::read(data)?;
	let mut reader = ValueReaderSlice::new_le(&data[HEADER_BYTES..]);
	let elements = (0..header.element_count::<T>()?)
		.map(|_| T::read(&mut reader))
		.collect::<Result<Vec<T>>>()?;
	let offsets = (0..header.offset_bytes / 4)
		.map(|_| reader.read_u32())
		.collect::<Result<Vec<u32>>>()?;
	Ok((elements, offsets))
}

/// Byte range of partition `partition` within the element array.
#[must_use]
pub fn partition_bytes(offsets: &[u32], element_bytes: u32, partition: usize) -> Range<u32> {
	let start = offsets.get(partition).copied().unwrap_or(element_bytes);
	let end = offsets.get(partition + 1).copied().unwrap_or(element_bytes);
	start..end
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lod::{Edge, Point};
	use pretty_assertions::assert_eq;

	const LOD: u32 = 3;

	fn input() -> Vec<Edge> {
		Edge::from_flat(&[
			137.24, 7.07, 1.0, 224.49, 123.95, 1.0, //
			124.51, 148.33, 2.0, 72.40, 22.15, 2.0, //
			160.13, 77.59, 3.0, 128.77, 183.32, 3.0, //
			65.36, 36.25, 4.0, 107.91, 250.01, 4.0, //
			96.05, 198.40, 2.0, 66.70, 73.39, 2.0,
		])
		.unwrap()
	}

	fn expected_edges() -> Vec<Edge> {
		Edge::from_flat(&[
			65.36, 36.25, 4.0, 107.91, 250.01, 4.0, //
			137.24, 7.07, 1.0, 224.49, 123.95, 1.0, //
			160.13, 77.59, 3.0, 128.77, 183.32, 3.0, //
			124.51, 148.33, 2.0, 72.40, 22.15, 2.0, //
			96.05, 198.40, 2.0, 66.70, 73.39, 2.0,
		])
		.unwrap()
	}

	fn expected_offsets() -> Vec<u32> {
		[(0, 7), (24, 10), (48, 9), (72, 12), (96, 8), (120, 18)]
			.iter()
			.flat_map(|(value, count)| std::iter::repeat_n(*value, *count))
			.collect()
	}

	#[rustfmt::skip]
	const EXPECTED_BYTES: [u8; 384] = [
		120, 0, 0, 0, 0, 1, 0, 0, 82, 184, 130, 66, 0, 0, 17, 66, 0, 0, 128,
		64, 236, 209, 215, 66, 143, 2, 122, 67, 0, 0, 128, 64, 113, 61, 9,
		67, 113, 61, 226, 64, 0, 0, 128, 63, 113, 125, 96, 67, 102, 230,
		247, 66, 0, 0, 128, 63, 72, 33, 32, 67, 20, 46, 155, 66, 0, 0, 64,
		64, 31, 197, 0, 67, 236, 81, 55, 67, 0, 0, 64, 64, 31, 5, 249, 66,
		123, 84, 20, 67, 0, 0, 0, 64, 205, 204, 144, 66, 51, 51, 177, 65,
		0, 0, 0, 64, 154, 25, 192, 66, 102, 102, 70, 67, 0, 0, 0, 64, 102,
		102, 133, 66, 174, 199, 146, 66, 0, 0, 0, 64, 0, 0, 0, 0, 0, 0, 0,
		0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 24,
		0, 0, 0, 24, 0, 0, 0, 24, 0, 0, 0, 24, 0, 0, 0, 24, 0, 0, 0, 24, 0,
		0, 0, 24, 0, 0, 0, 24, 0, 0, 0, 24, 0, 0, 0, 24, 0, 0, 0, 48, 0, 0,
		0, 48, 0, 0, 0, 48, 0, 0, 0, 48, 0, 0, 0, 48, 0, 0, 0, 48, 0, 0, 0,
		48, 0, 0, 0, 48, 0, 0, 0, 48, 0, 0, 0, 72, 0, 0, 0, 72, 0, 0, 0, 72,
		0, 0, 0, 72, 0, 0, 0, 72, 0, 0, 0, 72, 0, 0, 0, 72, 0, 0, 0, 72, 0,
		0, 0, 72, 0, 0, 0, 72, 0, 0, 0, 72, 0, 0, 0, 72, 0, 0, 0, 96, 0, 0,
		0, 96, 0, 0, 0, 96, 0, 0, 0, 96, 0, 0, 0, 96, 0, 0, 0, 96, 0, 0, 0,
		96, 0, 0, 0, 96, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0,
		120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0,
		0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0,
		0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120, 0, 0, 0, 120,
		0, 0, 0,
	];

	#[test]
	fn sort_edges_by_morton_code() -> Result<()> {
		let (edges, offsets) = sort_by_lod(&input(), LOD)?;
		assert_eq!(edges, expected_edges());
		assert_eq!(offsets, expected_offsets());
		assert_eq!(offsets.len(), 64);
		Ok(())
	}

	#[test]
	fn encode_edges() -> Result<()> {
		let blob = encode_lod(&input(), LOD)?;
		assert_eq!(blob.as_slice(), &EXPECTED_BYTES[..]);
		Ok(())
	}

	#[test]
	fn encoding_is_deterministic() -> Result<()> {
		let a = encode_lod(&input(), LOD)?;
		let b = encode_lod(&input(), LOD)?;
		assert_eq!(a, b);
		Ok(())
	}

	#[test]
	fn header_and_round_trip() -> Result<()> {
		let blob = encode_lod(&input(), LOD)?;
		let header = LodHeader::read(blob.as_slice())?;
		assert_eq!(header.element_count::<Edge>()?, 5);
		assert_eq!(header.lod()?, LOD);

		let (edges, offsets) = decode_lod::<Edge>(blob.as_slice())?;
		assert_eq!(edges, expected_edges());
		assert_eq!(offsets, expected_offsets());
		Ok(())
	}

	#[test]
	fn equal_codes_keep_input_order() -> Result<()> {
		let points = vec![
			Point::new(10.9, 10.1),
			Point::new(0.0, 0.0),
			Point::new(10.2, 10.8),
			Point::new(10.5, 10.5),
		];
		let (sorted, offsets) = sort_by_lod(&points, 1)?;
		assert_eq!(sorted, vec![points[1], points[0], points[2], points[3]]);
		assert_eq!(offsets, vec![0, 32, 32, 32]);
		Ok(())
	}

	#[test]
	fn offsets_never_decrease() -> Result<()> {
		let points: Vec<Point> = (0..200)
			.map(|i| Point::new((i * 37 % 256) as f32, (i * 91 % 256) as f32))
			.collect();
		let (_, offsets) = sort_by_lod(&points, 4)?;
		assert_eq!(offsets.len(), 256);
		assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
		assert!(offsets.iter().all(|o| *o <= 200 * 8));
		Ok(())
	}

	#[test]
	fn partitions_slice_the_element_array() -> Result<()> {
		let (_, offsets) = sort_by_lod(&input(), LOD)?;
		assert_eq!(partition_bytes(&offsets, 120, 6), 0..24);
		assert_eq!(partition_bytes(&offsets, 120, 16), 24..48);
		assert_eq!(partition_bytes(&offsets, 120, 0), 0..0);
		assert_eq!(partition_bytes(&offsets, 120, 63), 120..120);
		Ok(())
	}

	#[test]
	fn empty_input() -> Result<()> {
		let blob = encode_lod::<Point>(&[], 0)?;
		assert_eq!(blob.as_slice(), &[0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0]);
		let header = LodHeader::read(blob.as_slice())?;
		assert_eq!(header.lod()?, 0);
		assert_eq!(header.element_count::<Point>()?, 0);
		Ok(())
	}

	#[test]
	fn rejects_too_deep_lod() {
		let err = sort_by_lod(&input(), 9).unwrap_err().to_string();
		assert_eq!(err, "lod (9) must be <= 8");
	}

	#[test]
	fn rejects_truncated_payload() -> Result<()> {
		let blob = encode_lod(&input(), LOD)?;
		let data = &blob.as_slice()[..100];
		assert!(LodHeader::read(data).is_err());
		assert!(decode_lod::<Edge>(data).is_err());
		Ok(())
	}
}
