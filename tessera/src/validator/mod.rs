//! Turns untyped request JSON into typed requests, or into [`Diagnostics`].

mod diagnostics;
mod expression;
mod request;

pub use diagnostics::{Annotated, Diagnostic, Diagnostics, MISSING, Node};
pub use expression::validate_query;
pub use request::{validate_meta_request, validate_tile_request};
