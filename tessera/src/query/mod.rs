//! Leaf queries and the boolean expressions built from them.

mod equals;
mod exists;
mod expression;
mod has;
mod prefix;
mod range;

pub use equals::Equals;
pub use exists::Exists;
pub use expression::{ExprNode, Operator, QueryExpression, QueryLeaf};
pub use has::Has;
pub use prefix::Prefix;
pub use range::Range;

use crate::backend::Record;
use std::fmt::Debug;

/// A single named, parameterized predicate.
pub trait Query: Debug + Send + Sync {
	/// Stable hash that contributes to the request fingerprint.
	///
	/// Must be canonical JSON, so queries with different parameters never
	/// share a hash: `2` and `"2"` differ, as do `["a:b"]` and `["a","b"]`.
	fn hash(&self) -> String;

	/// Evaluates the predicate against a record of the in-memory backend.
	fn matches(&self, record: &Record) -> bool;
}
