//! Validation of query clauses into [`QueryExpression`]s.
//!
//! A clause is a single leaf object `{"range": {...}}` or an expression array
//! such as `[{"range": {...}}, "and", "not", [...]]`. Tokens are classified by
//! their JSON shape and checked pairwise, left to right:
//!
//! | token    | may be followed by        |
//! |----------|---------------------------|
//! | `exp`    | `binary`                  |
//! | `query`  | `binary`                  |
//! | `binary` | `unary`, `query`, `exp`   |
//! | `unary`  | `query`, `exp`            |
//!
//! Unrecognized tokens never cause an adjacency error, but are flagged themselves.

use super::{
	diagnostics::{Annotated, Diagnostics},
	request::single_entry,
};
use crate::{
	query::{ExprNode, Operator, QueryExpression, QueryLeaf},
	registry::Registry,
};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
	Exp,
	Query,
	Binary,
	Unary,
	Unrecognized,
}

impl TokenKind {
	fn classify(token: &Value) -> TokenKind {
		match token {
			Value::Array(_) => TokenKind::Exp,
			Value::Object(_) => TokenKind::Query,
			Value::String(s) => match Operator::parse(s) {
				Some(op) if op.is_unary() => TokenKind::Unary,
				Some(_) => TokenKind::Binary,
				None => TokenKind::Unrecognized,
			},
			_ => TokenKind::Unrecognized,
		}
	}

	fn may_follow(self, next: TokenKind) -> bool {
		use TokenKind::*;
		match (self, next) {
			(Unrecognized, _) | (_, Unrecognized) => true,
			(Exp | Query, Binary) => true,
			(Binary, Unary | Query | Exp) => true,
			(Unary, Query | Exp) => true,
			_ => false,
		}
	}

	fn is_operator(self) -> bool {
		matches!(self, TokenKind::Binary | TokenKind::Unary)
	}
}

/// Validates a query clause.
///
/// Returns an expression only if the diagnostics contain no errors.
pub fn validate_query(raw: &Value, registry: &Registry) -> (Option<QueryExpression>, Diagnostics) {
	let (annotated, expression) = annotate_query(raw, registry);
	(expression, Diagnostics::new(annotated))
}

pub(super) fn annotate_query(raw: &Value, registry: &Registry) -> (Annotated, Option<QueryExpression>) {
	let (mut annotated, node) = match raw {
		Value::Object(map) => validate_leaf(map, registry),
		Value::Array(items) => validate_expression(items, registry),
		other => (
			Annotated::from_value(other).with_error("`query` is not of correct type"),
			None,
		),
	};
	let expression = match node {
		Some(node) if !annotated.has_errors() => match QueryExpression::new(node) {
			Ok(expression) => Some(expression),
			Err(err) => {
				annotated.push_error(format!("{err:#}"));
				None
			}
		},
		_ => None,
	};
	(annotated, expression)
}

fn validate_leaf(map: &Map<String, Value>, registry: &Registry) -> (Annotated, Option<ExprNode>) {
	let (id, params) = match single_entry(map) {
		Ok(entry) => entry,
		Err(message) => return (Annotated::from_value(&Value::Object(map.clone())).with_error(message), None),
	};
	match registry.get_query(id, params) {
		Ok(query) => (
			Annotated::object(vec![(id.clone(), Annotated::from_value(params))]),
			Some(ExprNode::Leaf(QueryLeaf::new(id, query))),
		),
		Err(err) => (
			Annotated::object(vec![(id.clone(), Annotated::from_value(params).with_error(format!("{err:#}")))]),
			None,
		),
	}
}

fn validate_token(token: &Value, kind: TokenKind, registry: &Registry) -> (Annotated, Option<ExprNode>) {
	match (token, kind) {
		(Value::Array(items), _) => validate_expression(items, registry),
		(Value::Object(map), _) => validate_leaf(map, registry),
		(Value::String(s), TokenKind::Binary | TokenKind::Unary) => (
			Annotated::from_value(token),
			Operator::parse(s).map(ExprNode::Operator),
		),
		(Value::String(_), _) => (Annotated::from_value(token).with_error("invalid operator"), None),
		_ => (Annotated::from_value(token).with_error("unrecognized symbol"), None),
	}
}

fn validate_expression(items: &[Value], registry: &Registry) -> (Annotated, Option<ExprNode>) {
	if items.is_empty() {
		return (Annotated::array(vec![]).with_error("empty expression"), None);
	}

	let mut annotated = Vec::with_capacity(items.len());
	let mut nodes = Vec::with_capacity(items.len());
	let mut last: Option<TokenKind> = None;

	for token in items {
		let kind = TokenKind::classify(token);
		let (mut item, node) = validate_token(token, kind, registry);
		match last {
			None if kind == TokenKind::Binary => item.push_error("unexpected token"),
			Some(prev) if !prev.may_follow(kind) => item.push_error("unexpected token"),
			_ => {}
		}
		annotated.push(item);
		nodes.push(node);
		last = Some(kind);
	}

	if last.is_some_and(TokenKind::is_operator) {
		if let Some(item) = annotated.last_mut() {
			item.push_error("expression must not end with an operator");
		}
	}

	let annotated = Annotated::array(annotated);
	let node = if annotated.has_errors() {
		None
	} else {
		nodes.into_iter().collect::<Option<Vec<ExprNode>>>().map(ExprNode::Group)
	};
	(annotated, node)
}
