mod blob;
mod tile_coord;

pub use blob::Blob;
pub use tile_coord::TileCoord;
