//! Render orchestration: validate, resolve named parameters, serialize.

use serde::Serialize;

use crate::ast::visit::walk_query;
use crate::ast::{Expr, FromItem, JoinTarget, Query, SelectQuery};
use crate::context::RenderContext;
use crate::error::{RenderError, RenderResult};
use crate::params::{ParamResolver, Params, RenderMode};
use crate::writer::JpqlWriter;

/// Rendered query text with the parameters its placeholders refer to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResult {
    pub query: String,
    /// Placeholder name (without the colon) to bound value.
    pub params: Params,
}

/// Renders query models through a [`RenderContext`].
///
/// A renderer holds no per-render state and can be shared across threads;
/// every call builds its own writer and parameter resolver.
///
/// # Example
///
/// ```
/// use jpql_render::prelude::*;
///
/// let b = EntityRef::new("Book", "b");
/// let query = SelectQuery::new("Book", vec![Expr::entity(&b)], b.clone())
///     .filter(b.path("price").greater_than(Expr::lit(18)));
///
/// let result = JpqlRenderer::default()
///     .render(&query.into(), RenderMode::Placeholder)
///     .unwrap();
/// assert_eq!(result.query, "SELECT b FROM Book AS b WHERE b.price > :param1");
/// assert_eq!(result.params["param1"], Value::Int(18));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JpqlRenderer {
    context: RenderContext,
}

impl JpqlRenderer {
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Render `query` with no externally supplied parameters.
    pub fn render(&self, query: &Query, mode: RenderMode) -> RenderResult<RenderedResult> {
        self.render_inner(query, None, mode)
    }

    /// Render `query`, binding named parameters from `params`.
    ///
    /// A supplied value wins over one embedded in the parameter node.
    pub fn render_with_params(
        &self,
        query: &Query,
        params: &Params,
        mode: RenderMode,
    ) -> RenderResult<RenderedResult> {
        self.render_inner(query, Some(params), mode)
    }

    fn render_inner(&self, query: &Query, supplied: Option<&Params>, mode: RenderMode) -> RenderResult<RenderedResult> {
        tracing::debug!("render {} query ({:?} mode)", query.kind_name(), mode);

        validate(query)?;

        let mut resolver = match supplied {
            Some(params) => ParamResolver::with_supplied(mode, params),
            None => ParamResolver::new(mode),
        };
        for name in named_params(query, supplied)? {
            resolver.reserve(name);
        }

        let mut writer = JpqlWriter::new(resolver);
        self.context.serialize(query, &mut writer)?;
        let (query_text, params) = writer.finish()?;

        tracing::debug!("rendered {} chars, {} params", query_text.len(), params.len());
        Ok(RenderedResult {
            query: query_text,
            params,
        })
    }
}

/// Check the structural rules of `query` and of every subquery inside it.
pub fn validate(query: &Query) -> RenderResult<()> {
    match query {
        Query::Select(q) => validate_select(q)?,
        Query::Update(q) => {
            validate_entity(&q.entity.name, &q.entity.alias)?;
            if q.set.is_empty() {
                return Err(RenderError::shape("update query needs at least one assignment"));
            }
        }
        Query::Delete(q) => validate_entity(&q.entity.name, &q.entity.alias)?,
    }

    let mut result = Ok(());
    walk_query(query, &mut |expr| {
        if result.is_err() {
            return;
        }
        result = match expr {
            Expr::Subquery(sub)
            | Expr::Exists { subquery: sub, .. }
            | Expr::InSubquery { subquery: sub, .. } => validate_select(sub),
            Expr::Param { name, .. } => validate_param_name(name),
            Expr::In { list, .. } if list.is_empty() => {
                Err(RenderError::shape("IN predicate has an empty value list"))
            }
            _ => Ok(()),
        };
    });
    result
}

fn validate_select(query: &SelectQuery) -> RenderResult<()> {
    if query.select.is_empty() {
        return Err(RenderError::shape("select list is empty"));
    }
    if query.from.is_empty() {
        return Err(RenderError::shape("select query has no FROM entity"));
    }
    query.from.iter().try_for_each(validate_from_item)
}

fn validate_from_item(item: &FromItem) -> RenderResult<()> {
    validate_entity(&item.entity.name, &item.entity.alias)?;
    for join in &item.joins {
        match &join.target {
            JoinTarget::Entity(entity) => {
                validate_entity(&entity.name, &entity.alias)?;
                if join.on.is_none() {
                    return Err(RenderError::shape(format!(
                        "join of entity '{}' needs an ON condition",
                        entity.name
                    )));
                }
                if join.fetch {
                    return Err(RenderError::shape(format!(
                        "entity join of '{}' cannot be a fetch join",
                        entity.name
                    )));
                }
            }
            JoinTarget::Association { path, alias } => {
                if path.segments.iter().any(String::is_empty) {
                    return Err(RenderError::shape(format!("malformed join path '{}'", path)));
                }
                if alias.is_empty() {
                    return Err(RenderError::shape(format!("join of '{}' has no alias", path)));
                }
            }
        }
    }
    Ok(())
}

fn validate_entity(name: &str, alias: &str) -> RenderResult<()> {
    if name.is_empty() {
        return Err(RenderError::shape("entity name is empty"));
    }
    if alias.is_empty() {
        return Err(RenderError::shape(format!("entity '{}' has no alias", name)));
    }
    Ok(())
}

fn validate_param_name(name: &str) -> RenderResult<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RenderError::shape(format!("'{}' is not a valid parameter name", name)))
    }
}

/// Names of the named parameters in `query`, failing on the first one with
/// no value from either `supplied` or the node itself.
fn named_params<'q>(query: &'q Query, supplied: Option<&Params>) -> RenderResult<Vec<&'q str>> {
    let mut names = Vec::new();
    let mut missing = None;
    walk_query(query, &mut |expr| {
        if let Expr::Param { name, value } = expr {
            let bound = value.is_some() || supplied.is_some_and(|p| p.contains_key(name));
            if !bound && missing.is_none() {
                missing = Some(name.clone());
            }
            names.push(name.as_str());
        }
    });
    match missing {
        Some(name) => Err(RenderError::MissingParameterBinding(name)),
        None => Ok(names),
    }
}
