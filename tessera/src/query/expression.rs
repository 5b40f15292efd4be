//! Typed boolean query expressions.
//!
//! An expression is a tree of [`ExprNode`]s. Evaluation binds `not` tighter
//! than `and`, and `and` tighter than `or`.

use super::Query;
use crate::backend::Record;
use anyhow::{Result, bail};
use itertools::Itertools;
use serde_json::Value;
use std::{
	fmt::{self, Display},
	slice::Iter,
	sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	And,
	Or,
	Not,
}

impl Operator {
	/// Parses an operator token, ignoring case.
	#[must_use]
	pub fn parse(token: &str) -> Option<Operator> {
		match token.to_ascii_lowercase().as_str() {
			"and" => Some(Operator::And),
			"or" => Some(Operator::Or),
			"not" => Some(Operator::Not),
			_ => None,
		}
	}

	#[must_use]
	pub fn is_unary(&self) -> bool {
		*self == Operator::Not
	}

	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Operator::And => "and",
			Operator::Or => "or",
			Operator::Not => "not",
		}
	}
}

impl Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A resolved leaf query together with the name it was registered under.
#[derive(Debug, Clone)]
pub struct QueryLeaf {
	pub name: String,
	pub query: Arc<dyn Query>,
}

impl QueryLeaf {
	pub fn new(name: &str, query: Arc<dyn Query>) -> QueryLeaf {
		QueryLeaf {
			name: name.to_owned(),
			query,
		}
	}

	/// `{"<name>":<query hash>}`, itself canonical JSON.
	fn hash(&self) -> String {
		format!("{{{}:{}}}", Value::from(self.name.as_str()), self.query.hash())
	}
}

#[derive(Debug, Clone)]
pub enum ExprNode {
	Leaf(QueryLeaf),
	Operator(Operator),
	Group(Vec<ExprNode>),
}

impl ExprNode {
	fn hash(&self) -> String {
		match self {
			ExprNode::Leaf(leaf) => leaf.hash(),
			ExprNode::Operator(op) => op.to_string(),
			ExprNode::Group(nodes) => format!("({})", nodes.iter().map(ExprNode::hash).join(" ")),
		}
	}
}

#[derive(Debug)]
enum Predicate {
	Leaf(Arc<dyn Query>),
	Not(Box<Predicate>),
	All(Vec<Predicate>),
	Any(Vec<Predicate>),
}

impl Predicate {
	fn all(mut terms: Vec<Predicate>) -> Predicate {
		if terms.len() == 1 {
			terms.remove(0)
		} else {
			Predicate::All(terms)
		}
	}

	fn any(mut terms: Vec<Predicate>) -> Predicate {
		if terms.len() == 1 {
			terms.remove(0)
		} else {
			Predicate::Any(terms)
		}
	}

	fn eval(&self, record: &Record) -> bool {
		match self {
			Predicate::Leaf(query) => query.matches(record),
			Predicate::Not(inner) => !inner.eval(record),
			Predicate::All(terms) => terms.iter().all(|t| t.eval(record)),
			Predicate::Any(terms) => terms.iter().any(|t| t.eval(record)),
		}
	}

	fn compile_group(nodes: &[ExprNode]) -> Result<Predicate> {
		if nodes.is_empty() {
			bail!("expression is empty")
		}
		let mut tokens = nodes.iter();
		let mut any = Vec::new();
		let mut all = vec![Predicate::compile_operand(&mut tokens)?];
		while let Some(node) = tokens.next() {
			match node {
				ExprNode::Operator(Operator::And) => {}
				ExprNode::Operator(Operator::Or) => any.push(Predicate::all(std::mem::take(&mut all))),
				_ => bail!("expected `and` or `or` between operands"),
			}
			all.push(Predicate::compile_operand(&mut tokens)?);
		}
		any.push(Predicate::all(all));
		Ok(Predicate::any(any))
	}

	fn compile_operand(tokens: &mut Iter<ExprNode>) -> Result<Predicate> {
		match tokens.next() {
			Some(ExprNode::Leaf(leaf)) => Ok(Predicate::Leaf(Arc::clone(&leaf.query))),
			Some(ExprNode::Group(nodes)) => Predicate::compile_group(nodes),
			Some(ExprNode::Operator(Operator::Not)) => Ok(Predicate::Not(Box::new(Predicate::compile_operand(tokens)?))),
			Some(ExprNode::Operator(op)) => bail!("unexpected operator `{op}`"),
			None => bail!("expression ends with an operator"),
		}
	}
}

/// A fully resolved query expression, ready for fingerprinting and evaluation.
#[derive(Debug)]
pub struct QueryExpression {
	root: ExprNode,
	predicate: Predicate,
}

impl QueryExpression {
	/// Builds an expression from a leaf or a group. A lone operator is rejected.
	pub fn new(root: ExprNode) -> Result<QueryExpression> {
		let predicate = match &root {
			ExprNode::Leaf(leaf) => Predicate::Leaf(Arc::clone(&leaf.query)),
			ExprNode::Group(nodes) => Predicate::compile_group(nodes)?,
			ExprNode::Operator(op) => bail!("operator `{op}` is not an expression"),
		};
		Ok(QueryExpression { root, predicate })
	}

	#[must_use]
	pub fn root(&self) -> &ExprNode {
		&self.root
	}

	/// Canonical text of the expression, e.g.
	/// `({"range":["age","gte",19.0]} and not ({"has":["tag",["a"]]}))`.
	#[must_use]
	pub fn hash(&self) -> String {
		self.root.hash()
	}

	#[must_use]
	pub fn matches(&self, record: &Record) -> bool {
		self.predicate.eval(record)
	}
}
