//! Node kind identifiers and the borrowed `Part` view used for dispatch.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::expr::Expr;
use super::query::{Assignment, DeleteQuery, EntityRef, Join, Query, SelectQuery, Sort, UpdateQuery};

/// Stable identifier of an AST node kind.
///
/// Serializers are registered under a `NodeKind`, so the set of kinds is open:
/// a custom node carries its own kind and only needs a serializer registered
/// under the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKind(Cow<'static, str>);

impl NodeKind {
    // Queries and clauses
    pub const SELECT_QUERY: NodeKind = NodeKind::of("select_query");
    pub const UPDATE_QUERY: NodeKind = NodeKind::of("update_query");
    pub const DELETE_QUERY: NodeKind = NodeKind::of("delete_query");
    pub const ENTITY: NodeKind = NodeKind::of("entity");
    pub const JOIN: NodeKind = NodeKind::of("join");
    pub const SORT: NodeKind = NodeKind::of("sort");
    pub const ASSIGNMENT: NodeKind = NodeKind::of("assignment");

    // Expressions
    pub const LITERAL: NodeKind = NodeKind::of("literal");
    pub const PARAM: NodeKind = NodeKind::of("param");
    pub const PATH: NodeKind = NodeKind::of("path");
    pub const ENTITY_REFERENCE: NodeKind = NodeKind::of("entity_reference");
    pub const ALIAS: NodeKind = NodeKind::of("alias");
    pub const ARITHMETIC: NodeKind = NodeKind::of("arithmetic");
    pub const NEGATE: NodeKind = NodeKind::of("negate");
    pub const CASE: NodeKind = NodeKind::of("case");
    pub const SUBQUERY: NodeKind = NodeKind::of("subquery");

    // Predicates
    pub const COMPARISON: NodeKind = NodeKind::of("comparison");
    pub const AND: NodeKind = NodeKind::of("and");
    pub const OR: NodeKind = NodeKind::of("or");
    pub const NOT: NodeKind = NodeKind::of("not");
    pub const LIKE: NodeKind = NodeKind::of("like");
    pub const BETWEEN: NodeKind = NodeKind::of("between");
    pub const IN: NodeKind = NodeKind::of("in");
    pub const IN_SUBQUERY: NodeKind = NodeKind::of("in_subquery");
    pub const IS_NULL: NodeKind = NodeKind::of("is_null");
    pub const IS_EMPTY: NodeKind = NodeKind::of("is_empty");
    pub const MEMBER_OF: NodeKind = NodeKind::of("member_of");
    pub const EXISTS: NodeKind = NodeKind::of("exists");

    // Functions
    pub const LOWER: NodeKind = NodeKind::of("lower");
    pub const UPPER: NodeKind = NodeKind::of("upper");
    pub const LENGTH: NodeKind = NodeKind::of("length");
    pub const ABS: NodeKind = NodeKind::of("abs");
    pub const SQRT: NodeKind = NodeKind::of("sqrt");
    pub const SIZE: NodeKind = NodeKind::of("size");
    pub const CURRENT_DATE: NodeKind = NodeKind::of("current_date");
    pub const CURRENT_TIME: NodeKind = NodeKind::of("current_time");
    pub const CURRENT_TIMESTAMP: NodeKind = NodeKind::of("current_timestamp");
    pub const CONCAT: NodeKind = NodeKind::of("concat");
    pub const SUBSTRING: NodeKind = NodeKind::of("substring");
    pub const COALESCE: NodeKind = NodeKind::of("coalesce");
    pub const NULLIF: NodeKind = NodeKind::of("nullif");
    pub const COUNT: NodeKind = NodeKind::of("count");
    pub const SUM: NodeKind = NodeKind::of("sum");
    pub const AVG: NodeKind = NodeKind::of("avg");
    pub const MIN: NodeKind = NodeKind::of("min");
    pub const MAX: NodeKind = NodeKind::of("max");
    pub const FUNCTION: NodeKind = NodeKind::of("function");

    /// Kind with a static name, usable in constants.
    pub const fn of(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for NodeKind {
    fn from(name: &'static str) -> Self {
        Self::of(name)
    }
}

impl From<String> for NodeKind {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Borrowed view of any node a serializer can render.
#[derive(Debug, Clone, Copy)]
pub enum Part<'a> {
    Select(&'a SelectQuery),
    Update(&'a UpdateQuery),
    Delete(&'a DeleteQuery),
    Entity(&'a EntityRef),
    Join(&'a Join),
    Sort(&'a Sort),
    Assignment(&'a Assignment),
    Expr(&'a Expr),
}

impl Part<'_> {
    /// The kind this part dispatches on.
    pub fn kind(&self) -> NodeKind {
        match self {
            Part::Select(_) => NodeKind::SELECT_QUERY,
            Part::Update(_) => NodeKind::UPDATE_QUERY,
            Part::Delete(_) => NodeKind::DELETE_QUERY,
            Part::Entity(_) => NodeKind::ENTITY,
            Part::Join(_) => NodeKind::JOIN,
            Part::Sort(_) => NodeKind::SORT,
            Part::Assignment(_) => NodeKind::ASSIGNMENT,
            Part::Expr(expr) => expr.kind(),
        }
    }
}

impl<'a> From<&'a Query> for Part<'a> {
    fn from(query: &'a Query) -> Self {
        match query {
            Query::Select(q) => Part::Select(q),
            Query::Update(q) => Part::Update(q),
            Query::Delete(q) => Part::Delete(q),
        }
    }
}

impl<'a> From<&'a SelectQuery> for Part<'a> {
    fn from(query: &'a SelectQuery) -> Self {
        Part::Select(query)
    }
}

impl<'a> From<&'a UpdateQuery> for Part<'a> {
    fn from(query: &'a UpdateQuery) -> Self {
        Part::Update(query)
    }
}

impl<'a> From<&'a DeleteQuery> for Part<'a> {
    fn from(query: &'a DeleteQuery) -> Self {
        Part::Delete(query)
    }
}

impl<'a> From<&'a EntityRef> for Part<'a> {
    fn from(entity: &'a EntityRef) -> Self {
        Part::Entity(entity)
    }
}

impl<'a> From<&'a Join> for Part<'a> {
    fn from(join: &'a Join) -> Self {
        Part::Join(join)
    }
}

impl<'a> From<&'a Sort> for Part<'a> {
    fn from(sort: &'a Sort) -> Self {
        Part::Sort(sort)
    }
}

impl<'a> From<&'a Assignment> for Part<'a> {
    fn from(assignment: &'a Assignment) -> Self {
        Part::Assignment(assignment)
    }
}

impl<'a> From<&'a Expr> for Part<'a> {
    fn from(expr: &'a Expr) -> Self {
        Part::Expr(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_and_owned_kinds_compare_equal() {
        assert_eq!(NodeKind::from("lower".to_string()), NodeKind::LOWER);
        assert_eq!(NodeKind::LOWER.to_string(), "lower");
    }

    #[test]
    fn test_kind_serde_is_a_plain_string() {
        let json = serde_json::to_string(&NodeKind::CURRENT_TIME).unwrap();
        assert_eq!(json, "\"current_time\"");

        let kind: NodeKind = serde_json::from_str("\"soundex\"").unwrap();
        assert_eq!(kind.as_str(), "soundex");
    }
}
