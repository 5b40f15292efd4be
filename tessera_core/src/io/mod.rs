//! Little endian value readers and writers used by the LOD encoder.

mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
