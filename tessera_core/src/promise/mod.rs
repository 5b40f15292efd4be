//! One-shot, multi-waiter promises and a keyed registry of in-flight promises.
//!
//! A [`Promise`] is resolved exactly once; every holder awaiting it observes
//! the same value. A [`PromiseMap`] hands out at most one promise per key, which
//! is what single-flight tile generation is built on.

mod one_shot;
mod promise_map;

pub use one_shot::Promise;
pub use promise_map::{PromiseEntry, PromiseMap};
