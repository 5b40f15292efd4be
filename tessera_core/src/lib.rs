//! Core building blocks of Tessera: tile coordinates, byte blobs, the LOD binary
//! encoder and the promise primitives used for single-flight tile generation.

pub mod io;
pub mod lod;
pub mod promise;
pub mod types;

pub use types::*;
