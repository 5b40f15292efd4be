//! Level-of-detail (LOD) binary encoding of tile-local points and edges.
//!
//! Elements are ordered by the Morton (Z-order) code of their anchor point and
//! bucketed into `4^lod` spatial partitions. The encoded payload carries one
//! byte offset per partition so a client can slice out any quadtree cell, at
//! any coarser level, without re-sorting.
//!
//! ```text
//! u32 LE   byte length of the element array (E)
//! u32 LE   byte length of the offset array (O = 4 * 4^lod)
//! E bytes  elements as f32 LE (edges: x1 y1 w1 x2 y2 w2, points: x y)
//! O bytes  partition offsets as u32 LE
//! ```

mod element;
mod encode;
mod morton;

pub use element::{Edge, LodElement, Point, Vertex};
pub use encode::{LodHeader, MAX_LOD, decode_lod, encode_lod, partition_bytes, sort_by_lod};
pub use morton::{MAX_COORD, MAX_MORTON, morton};
