//! Structured validation diagnostics.
//!
//! Validation builds an [`Annotated`] mirror of the input JSON, attaching error
//! messages to the offending nodes. The mirror is rendered to text only when a
//! response is produced:
//!
//! ```text
//! {
//!   "uri": "taxi",
//!   "coord": {
//!     "x": 1,
//!     "y": 2,
//!     "z": ???  <-- error: `coord.z` not found
//!   }
//! }
//! ```

use serde_json::Value;
use std::fmt::{self, Display};

/// Placeholder rendered for a missing required field.
pub const MISSING: &str = "???";

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	Value(Value),
	Missing,
	Object(Vec<(String, Annotated)>),
	Array(Vec<Annotated>),
}

/// A node of the mirrored input with the errors found at this position.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotated {
	pub node: Node,
	pub errors: Vec<String>,
}

impl Annotated {
	fn new(node: Node) -> Annotated {
		Annotated { node, errors: Vec::new() }
	}

	#[must_use]
	pub fn missing() -> Annotated {
		Annotated::new(Node::Missing)
	}

	#[must_use]
	pub fn object(entries: Vec<(String, Annotated)>) -> Annotated {
		Annotated::new(Node::Object(entries))
	}

	#[must_use]
	pub fn array(items: Vec<Annotated>) -> Annotated {
		Annotated::new(Node::Array(items))
	}

	/// Mirrors `value` without any errors.
	#[must_use]
	pub fn from_value(value: &Value) -> Annotated {
		match value {
			Value::Object(map) => Annotated::object(
				map
					.iter()
					.map(|(key, value)| (key.clone(), Annotated::from_value(value)))
					.collect(),
			),
			Value::Array(items) => Annotated::array(items.iter().map(Annotated::from_value).collect()),
			scalar => Annotated::new(Node::Value(scalar.clone())),
		}
	}

	pub fn push_error(&mut self, message: impl Into<String>) {
		self.errors.push(message.into());
	}

	#[must_use]
	pub fn with_error(mut self, message: impl Into<String>) -> Annotated {
		self.push_error(message);
		self
	}

	/// Whether this node or any descendant carries an error.
	#[must_use]
	pub fn has_errors(&self) -> bool {
		if !self.errors.is_empty() {
			return true;
		}
		match &self.node {
			Node::Object(entries) => entries.iter().any(|(_, child)| child.has_errors()),
			Node::Array(items) => items.iter().any(Annotated::has_errors),
			Node::Value(_) | Node::Missing => false,
		}
	}

	fn collect(&self, path: &str, out: &mut Vec<Diagnostic>) {
		for message in &self.errors {
			out.push(Diagnostic {
				path: path.to_owned(),
				message: message.clone(),
			});
		}
		match &self.node {
			Node::Object(entries) => {
				for (key, child) in entries {
					let child_path = if path.is_empty() {
						key.clone()
					} else {
						format!("{path}.{key}")
					};
					child.collect(&child_path, out);
				}
			}
			Node::Array(items) => {
				for (index, child) in items.iter().enumerate() {
					child.collect(&format!("{path}[{index}]"), out);
				}
			}
			Node::Value(_) | Node::Missing => {}
		}
	}

	fn markers(&self) -> String {
		self.errors.iter().map(|e| format!("  <-- error: {e}")).collect()
	}

	fn render(&self, depth: usize, key: Option<&str>, comma: bool, out: &mut Vec<String>) {
		let indent = INDENT.repeat(depth);
		let prefix = match key {
			Some(key) => format!("{indent}{}: ", Value::from(key)),
			None => indent.clone(),
		};
		let comma = if comma { "," } else { "" };
		let markers = self.markers();

		match &self.node {
			Node::Value(value) => out.push(format!("{prefix}{value}{comma}{markers}")),
			Node::Missing => out.push(format!("{prefix}{MISSING}{comma}{markers}")),
			Node::Object(entries) if entries.is_empty() => out.push(format!("{prefix}{{}}{comma}{markers}")),
			Node::Array(items) if items.is_empty() => out.push(format!("{prefix}[]{comma}{markers}")),
			Node::Object(entries) => {
				out.push(format!("{prefix}{{{markers}"));
				for (index, (key, child)) in entries.iter().enumerate() {
					child.render(depth + 1, Some(key), index + 1 < entries.len(), out);
				}
				out.push(format!("{indent}}}{comma}"));
			}
			Node::Array(items) => {
				out.push(format!("{prefix}[{markers}"));
				for (index, child) in items.iter().enumerate() {
					child.render(depth + 1, None, index + 1 < items.len(), out);
				}
				out.push(format!("{indent}]{comma}"));
			}
		}
	}
}

/// One error at a path such as `coord.z` or `query[1]`. The root path is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub path: String,
	pub message: String,
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_empty() {
			f.write_str(&self.message)
		} else {
			write!(f, "{}: {}", self.path, self.message)
		}
	}
}

/// The annotated input of a failed (or successful) validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
	root: Annotated,
}

impl Diagnostics {
	#[must_use]
	pub fn new(root: Annotated) -> Diagnostics {
		Diagnostics { root }
	}

	#[must_use]
	pub fn root(&self) -> &Annotated {
		&self.root
	}

	#[must_use]
	pub fn has_errors(&self) -> bool {
		self.root.has_errors()
	}

	/// All errors in document order.
	#[must_use]
	pub fn errors(&self) -> Vec<Diagnostic> {
		let mut errors = Vec::new();
		self.root.collect("", &mut errors);
		errors
	}

	/// Indented mirror of the input with inline error markers.
	#[must_use]
	pub fn render(&self) -> String {
		let mut lines = Vec::new();
		self.root.render(0, None, false, &mut lines);
		lines.join("\n")
	}
}

impl Display for Diagnostics {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}

impl std::error::Error for Diagnostics {}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn sample() -> Diagnostics {
		let coord = Annotated::object(vec![
			("x".into(), Annotated::from_value(&json!(1))),
			("y".into(), Annotated::from_value(&json!("a")).with_error("`coord.y` is not of type `number`")),
			("z".into(), Annotated::missing().with_error("`coord.z` not found")),
		]);
		let query = Annotated::array(vec![
			Annotated::from_value(&json!({"exists": {"field": "a"}})),
			Annotated::from_value(&json!({"has": {}})).with_error("unexpected token"),
		]);
		Diagnostics::new(Annotated::object(vec![
			("uri".into(), Annotated::from_value(&json!("taxi"))),
			("coord".into(), coord),
			("query".into(), query),
			("tile".into(), Annotated::object(vec![])),
		]))
	}

	#[test]
	fn render() {
		let expected = [
			"{",
			"  \"uri\": \"taxi\",",
			"  \"coord\": {",
			"    \"x\": 1,",
			"    \"y\": \"a\",  <-- error: `coord.y` is not of type `number`",
			"    \"z\": ???  <-- error: `coord.z` not found",
			"  },",
			"  \"query\": [",
			"    {",
			"      \"exists\": {",
			"        \"field\": \"a\"",
			"      }",
			"    },",
			"    {  <-- error: unexpected token",
			"      \"has\": {}",
			"    }",
			"  ],",
			"  \"tile\": {}",
			"}",
		]
		.join("\n");
		assert_eq!(sample().render(), expected);
	}

	#[test]
	fn errors_with_paths() {
		let diagnostics = sample();
		assert!(diagnostics.has_errors());
		let errors: Vec<String> = diagnostics.errors().iter().map(ToString::to_string).collect();
		assert_eq!(
			errors,
			vec![
				"coord.y: `coord.y` is not of type `number`",
				"coord.z: `coord.z` not found",
				"query[1]: unexpected token",
			]
		);
	}

	#[test]
	fn clean_mirror() {
		let diagnostics = Diagnostics::new(Annotated::from_value(&json!({"a": [1, null]})));
		assert!(!diagnostics.has_errors());
		assert!(diagnostics.errors().is_empty());
		assert_eq!(diagnostics.render(), "{\n  \"a\": [\n    1,\n    null\n  ]\n}");
	}
}
