//! Read-only, depth-first traversal of the query model.
//!
//! Expressions are visited pre-order and in the same left-to-right order the
//! default serializers emit them, including the bodies of subqueries.

use super::expr::Expr;
use super::query::{DeleteQuery, Query, SelectQuery, UpdateQuery};

pub fn walk_query<'a>(query: &'a Query, visit: &mut dyn FnMut(&'a Expr)) {
    match query {
        Query::Select(q) => walk_select(q, visit),
        Query::Update(q) => walk_update(q, visit),
        Query::Delete(q) => walk_delete(q, visit),
    }
}

pub fn walk_select<'a>(query: &'a SelectQuery, visit: &mut dyn FnMut(&'a Expr)) {
    for item in &query.select {
        walk_expr(item, visit);
    }
    for from in &query.from {
        for join in &from.joins {
            if let Some(on) = &join.on {
                walk_expr(on, visit);
            }
        }
    }
    if let Some(predicate) = &query.where_clause {
        walk_expr(predicate, visit);
    }
    for group in &query.group_by {
        walk_expr(group, visit);
    }
    if let Some(predicate) = &query.having {
        walk_expr(predicate, visit);
    }
    for sort in &query.order_by {
        walk_expr(&sort.expr, visit);
    }
}

pub fn walk_update<'a>(query: &'a UpdateQuery, visit: &mut dyn FnMut(&'a Expr)) {
    for assignment in &query.set {
        walk_expr(&assignment.value, visit);
    }
    if let Some(predicate) = &query.where_clause {
        walk_expr(predicate, visit);
    }
}

pub fn walk_delete<'a>(query: &'a DeleteQuery, visit: &mut dyn FnMut(&'a Expr)) {
    if let Some(predicate) = &query.where_clause {
        walk_expr(predicate, visit);
    }
}

pub fn walk_expr<'a>(expr: &'a Expr, visit: &mut dyn FnMut(&'a Expr)) {
    visit(expr);
    match expr {
        Expr::Literal(_)
        | Expr::Param { .. }
        | Expr::Path(_)
        | Expr::Entity(_)
        | Expr::IsEmpty { .. }
        | Expr::CurrentDate
        | Expr::CurrentTime
        | Expr::CurrentTimestamp => {}
        Expr::Alias { value, .. }
        | Expr::Negate(value)
        | Expr::Not(value)
        | Expr::IsNull { value, .. }
        | Expr::MemberOf { value, .. }
        | Expr::Aggregate { value, .. }
        | Expr::Lower(value)
        | Expr::Upper(value)
        | Expr::Length(value)
        | Expr::Abs(value)
        | Expr::Sqrt(value)
        | Expr::Size(value) => walk_expr(value, visit),
        Expr::Arithmetic { left, right, .. }
        | Expr::Comparison { left, right, .. }
        | Expr::NullIf { left, right } => {
            walk_expr(left, visit);
            walk_expr(right, visit);
        }
        Expr::Case {
            operand,
            whens,
            otherwise,
        } => {
            if let Some(operand) = operand {
                walk_expr(operand, visit);
            }
            for when in whens {
                walk_expr(&when.condition, visit);
                walk_expr(&when.result, visit);
            }
            if let Some(otherwise) = otherwise {
                walk_expr(otherwise, visit);
            }
        }
        Expr::Subquery(subquery) | Expr::Exists { subquery, .. } => walk_select(subquery, visit),
        Expr::Logical { operands: args, .. }
        | Expr::Concat(args)
        | Expr::Coalesce(args)
        | Expr::Function { args, .. } => {
            for arg in args {
                walk_expr(arg, visit);
            }
        }
        Expr::Custom(node) => {
            for arg in &node.args {
                walk_expr(arg, visit);
            }
        }
        Expr::Like { value, pattern, .. } => {
            walk_expr(value, visit);
            walk_expr(pattern, visit);
        }
        Expr::Between {
            value, low, high, ..
        } => {
            walk_expr(value, visit);
            walk_expr(low, visit);
            walk_expr(high, visit);
        }
        Expr::In { value, list, .. } => {
            walk_expr(value, visit);
            for item in list {
                walk_expr(item, visit);
            }
        }
        Expr::InSubquery {
            value, subquery, ..
        } => {
            walk_expr(value, visit);
            walk_select(subquery, visit);
        }
        Expr::Substring {
            value,
            start,
            length,
        } => {
            walk_expr(value, visit);
            walk_expr(start, visit);
            if let Some(length) = length {
                walk_expr(length, visit);
            }
        }
    }
}

/// Count the literal leaves of a query.
pub fn count_literals(query: &Query) -> usize {
    let mut count = 0;
    walk_query(query, &mut |expr| {
        if let Expr::Literal(_) = expr {
            count += 1;
        }
    });
    count
}
