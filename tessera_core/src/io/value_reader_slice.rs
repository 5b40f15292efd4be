use anyhow::{Result, ensure};
use byteorder::{ByteOrder, LittleEndian};
use std::marker::PhantomData;

/// Reads fixed-width values from a byte slice using the byte order `E`.
pub struct ValueReaderSlice<'a, E: ByteOrder> {
	_phantom: PhantomData<E>,
	slice: &'a [u8],
	position: usize,
}

impl<'a, E: ByteOrder> ValueReaderSlice<'a, E> {
	#[must_use]
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a, E> {
		ValueReaderSlice {
			_phantom: PhantomData,
			slice,
			position: 0,
		}
	}

	#[must_use]
	pub fn position(&self) -> usize {
		self.position
	}

	#[must_use]
	pub fn remaining(&self) -> usize {
		self.slice.len() - self.position
	}

	fn take(&mut self, length: usize) -> Result<&'a [u8]> {
		ensure!(
			self.remaining() >= length,
			"unexpected end of data: need {length} bytes at position {}, {} remaining",
			self.position,
			self.remaining()
		);
		let bytes = &self.slice[self.position..self.position + length];
		self.position += length;
		Ok(bytes)
	}

	pub fn read_u32(&mut self) -> Result<u32> {
		Ok(E::read_u32(self.take(4)?))
	}

	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(E::read_f32(self.take(4)?))
	}
}

impl<'a> ValueReaderSlice<'a, LittleEndian> {
	#[must_use]
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a, LittleEndian> {
		ValueReaderSlice::new(slice)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_values() -> Result<()> {
		let data = [120, 0, 0, 0, 0, 0, 128, 63];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(reader.read_u32()?, 120);
		assert_eq!(reader.read_f32()?, 1.0);
		assert_eq!(reader.remaining(), 0);
		Ok(())
	}

	#[test]
	fn test_read_past_end() {
		let data = [1, 2];
		let mut reader = ValueReaderSlice::new_le(&data);
		let err = reader.read_u32().unwrap_err().to_string();
		assert!(err.starts_with("unexpected end of data"));
		assert_eq!(reader.position(), 0);
	}
}
