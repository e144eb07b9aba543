//! Serializers: one per node kind.
//!
//! A serializer writes the tokens of its own node and hands every nested node
//! back to the [`RenderContext`], which looks up the serializer registered for
//! that node's kind. Serializers never call each other directly, so any single
//! kind can be overridden without touching the rest.

pub mod clause;
pub mod expression;
pub mod function;
pub mod predicate;
pub mod query;

use std::sync::Arc;

use crate::ast::{Expr, NodeKind, Operand, Part, Precedence, needs_parentheses};
use crate::context::RenderContext;
use crate::error::{RenderError, RenderResult};
use crate::writer::JpqlWriter;

/// Renders one node kind.
pub trait Serializer: Send + Sync {
    /// Kind this serializer is registered under.
    fn handled_kind(&self) -> NodeKind;

    /// Write `part` to `writer`, delegating children through `context`.
    fn serialize(
        &self,
        part: Part<'_>,
        writer: &mut JpqlWriter<'_>,
        context: &RenderContext,
    ) -> RenderResult<()>;
}

/// The built-in serializer set.
pub fn defaults() -> Vec<Arc<dyn Serializer>> {
    let mut serializers: Vec<Arc<dyn Serializer>> = Vec::new();
    serializers.extend(query::serializers());
    serializers.extend(clause::serializers());
    serializers.extend(expression::serializers());
    serializers.extend(predicate::serializers());
    serializers.extend(function::serializers());
    serializers
}

/// Serialize `operand`, parenthesized if the precedence table requires it.
pub fn write_operand(
    writer: &mut JpqlWriter<'_>,
    context: &RenderContext,
    operand: &Expr,
    parent: Precedence,
    position: Operand,
) -> RenderResult<()> {
    if needs_parentheses(parent, operand.precedence(), position) {
        writer.write_parentheses(|w| context.serialize(operand, w))
    } else {
        context.serialize(operand, writer)
    }
}

/// Serialize `args` as a comma-separated list.
pub fn write_args(writer: &mut JpqlWriter<'_>, context: &RenderContext, args: &[Expr]) -> RenderResult<()> {
    writer.write_each(args, ", ", |w, arg| context.serialize(arg, w))
}

pub(crate) fn mismatch(expected: NodeKind, part: &Part<'_>) -> RenderError {
    RenderError::mismatch(expected, part.kind())
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::ast::Part;
    use crate::context::RenderContext;
    use crate::error::RenderResult;
    use crate::params::{ParamResolver, Params, RenderMode};
    use crate::writer::JpqlWriter;

    /// Render a single part with the default context.
    pub fn render<'a>(part: impl Into<Part<'a>>, mode: RenderMode) -> RenderResult<(String, Params)> {
        let context = RenderContext::default();
        let mut writer = JpqlWriter::new(ParamResolver::new(mode));
        context.serialize(part, &mut writer)?;
        writer.finish()
    }

    pub fn inline<'a>(part: impl Into<Part<'a>>) -> String {
        render(part, RenderMode::Inline).unwrap().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_kinds_are_unique() {
        let all = defaults();
        let kinds: HashSet<NodeKind> = all.iter().map(|s| s.handled_kind()).collect();
        assert_eq!(kinds.len(), all.len());
    }

    #[test]
    fn test_custom_kind_has_no_default() {
        let kinds: HashSet<NodeKind> = defaults().iter().map(|s| s.handled_kind()).collect();
        assert!(kinds.contains(&NodeKind::CURRENT_TIME));
        assert!(!kinds.contains(&NodeKind::from("soundex")));
    }
}
