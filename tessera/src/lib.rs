//! Tessera generates data tiles for large-scale visualization.
//!
//! A client posts a JSON request naming a dataset, a tile coordinate, a tile
//! type with its parameters and an optional query expression. The request is
//! validated into typed form (see [`validator`]), reduced to a fingerprint and
//! handed to the [`generation::GenerationCoordinator`], which runs at most one
//! generation per fingerprint and shares its result with every concurrent
//! caller.
//!
//! Point and graph tiles use the level-of-detail layout of
//! [`tessera_core::lod`].

pub mod backend;
pub mod config;
pub mod generation;
pub mod meta;
pub mod params;
pub mod query;
pub mod registry;
pub mod request;
pub mod server;
pub mod tile;
pub mod validator;

pub use tessera_core as core;
