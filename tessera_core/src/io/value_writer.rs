//! The `ValueWriter` trait writes fixed-width values with a chosen byte order.
//!
//! ```rust
//! use tessera_core::io::{ValueWriter, ValueWriterBlob};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut writer = ValueWriterBlob::new_le();
//!     writer.write_u32(120)?;
//!     writer.write_f32(1.0)?;
//!     assert_eq!(writer.into_blob().into_vec(), vec![120, 0, 0, 0, 0, 0, 128, 63]);
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use byteorder::{ByteOrder, WriteBytesExt};
use std::io::Write;

/// A trait for writing values to various destinations with support for different byte orders.
pub trait ValueWriter<E: ByteOrder> {
	/// Returns a mutable reference to the underlying writer.
	fn get_writer(&mut self) -> &mut dyn Write;

	/// Returns the current write position.
	fn position(&mut self) -> Result<u64>;

	fn is_empty(&mut self) -> Result<bool> {
		Ok(self.position()? == 0)
	}

	fn write_u32(&mut self, value: u32) -> Result<()> {
		Ok(self.get_writer().write_u32::<E>(value)?)
	}

	fn write_f32(&mut self, value: f32) -> Result<()> {
		Ok(self.get_writer().write_f32::<E>(value)?)
	}

	/// Writes every value of `values` as a `f32`.
	fn write_f32_slice(&mut self, values: &[f32]) -> Result<()> {
		for value in values {
			self.write_f32(*value)?;
		}
		Ok(())
	}

	/// Writes every value of `values` as a `u32`.
	fn write_u32_slice(&mut self, values: &[u32]) -> Result<()> {
		for value in values {
			self.write_u32(*value)?;
		}
		Ok(())
	}
}
