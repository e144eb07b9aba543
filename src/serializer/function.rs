//! Function-style nodes: `KEYWORD(args)`.

use std::sync::Arc;

use super::{Serializer, mismatch, write_args};
use crate::ast::{AggregateFunc, Expr, NodeKind, Part};
use crate::context::RenderContext;
use crate::error::RenderResult;
use crate::params::quote;
use crate::writer::JpqlWriter;

/// Built-in call kinds and their default keywords.
pub fn call_keywords() -> Vec<(NodeKind, &'static str)> {
    vec![
        (NodeKind::LOWER, "LOWER"),
        (NodeKind::UPPER, "UPPER"),
        (NodeKind::LENGTH, "LENGTH"),
        (NodeKind::ABS, "ABS"),
        (NodeKind::SQRT, "SQRT"),
        (NodeKind::SIZE, "SIZE"),
        (NodeKind::CURRENT_DATE, "CURRENT_DATE"),
        (NodeKind::CURRENT_TIME, "CURRENT_TIME"),
        (NodeKind::CURRENT_TIMESTAMP, "CURRENT_TIMESTAMP"),
        (NodeKind::CONCAT, "CONCAT"),
        (NodeKind::SUBSTRING, "SUBSTRING"),
        (NodeKind::COALESCE, "COALESCE"),
        (NodeKind::NULLIF, "NULLIF"),
    ]
}

pub fn serializers() -> Vec<Arc<dyn Serializer>> {
    let mut serializers: Vec<Arc<dyn Serializer>> = call_keywords()
        .into_iter()
        .map(|(kind, keyword)| Arc::new(CallSerializer::new(kind, keyword)) as Arc<dyn Serializer>)
        .collect();
    for func in [
        AggregateFunc::Count,
        AggregateFunc::Sum,
        AggregateFunc::Avg,
        AggregateFunc::Min,
        AggregateFunc::Max,
    ] {
        serializers.push(Arc::new(AggregateSerializer::new(func)));
    }
    serializers.push(Arc::new(FunctionSerializer));
    serializers
}

/// Arguments of a call-shaped node, in textual order.
fn call_args(expr: &Expr) -> Option<Vec<&Expr>> {
    if let Some(arg) = expr.unary_argument() {
        return Some(vec![arg]);
    }
    match expr {
        Expr::CurrentDate | Expr::CurrentTime | Expr::CurrentTimestamp => Some(Vec::new()),
        Expr::Concat(args) | Expr::Coalesce(args) => Some(args.iter().collect()),
        Expr::Substring {
            value,
            start,
            length,
        } => {
            let mut args = vec![&**value, &**start];
            if let Some(length) = length {
                args.push(&**length);
            }
            Some(args)
        }
        Expr::NullIf { left, right } => Some(vec![&**left, &**right]),
        Expr::Custom(node) => Some(node.args.iter().collect()),
        _ => None,
    }
}

/// Writes `KEYWORD(arg, ...)` for the node kind it is registered under.
///
/// Zero-argument nodes such as `current_time` get an empty argument block,
/// `CURRENT_TIME()`. Custom nodes are accepted too, which makes this the
/// serializer to register for simple user-defined functions.
#[derive(Debug, Clone)]
pub struct CallSerializer {
    kind: NodeKind,
    keyword: String,
}

impl CallSerializer {
    pub fn new(kind: impl Into<NodeKind>, keyword: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            keyword: keyword.into(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Serializer for CallSerializer {
    fn handled_kind(&self) -> NodeKind {
        self.kind.clone()
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let args = match part {
            Part::Expr(expr) if expr.kind() == self.kind => call_args(expr),
            _ => None,
        };
        let Some(args) = args else {
            return Err(mismatch(self.handled_kind(), &part));
        };

        writer.write(&self.keyword);
        writer.write_parentheses(|w| w.write_each(args, ", ", |w, arg| context.serialize(arg, w)))
    }
}

/// `COUNT([DISTINCT ]x)` and friends.
pub struct AggregateSerializer {
    func: AggregateFunc,
}

impl AggregateSerializer {
    pub fn new(func: AggregateFunc) -> Self {
        Self { func }
    }
}

impl Serializer for AggregateSerializer {
    fn handled_kind(&self) -> NodeKind {
        match self.func {
            AggregateFunc::Count => NodeKind::COUNT,
            AggregateFunc::Sum => NodeKind::SUM,
            AggregateFunc::Avg => NodeKind::AVG,
            AggregateFunc::Min => NodeKind::MIN,
            AggregateFunc::Max => NodeKind::MAX,
        }
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Aggregate {
            func,
            distinct,
            value,
        }) = part
        else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        if *func != self.func {
            return Err(mismatch(self.handled_kind(), &part));
        }

        writer.write(func.keyword());
        writer.write_parentheses(|w| {
            if *distinct {
                w.write("DISTINCT");
                w.write_space();
            }
            context.serialize(&**value, w)
        })
    }
}

/// Database function escape, `FUNCTION('name', args...)`.
pub struct FunctionSerializer;

impl Serializer for FunctionSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::FUNCTION
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Function { name, args }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write("FUNCTION");
        writer.write_parentheses(|w| {
            w.write(&quote(name));
            if !args.is_empty() {
                w.write(", ");
                write_args(w, context, args)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;
    use crate::params::RenderMode;
    use crate::serializer::testing::{inline, render};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lower_inline() {
        let (text, params) = render(&Expr::lower(Expr::lit("Foo")), RenderMode::Inline).unwrap();
        assert_eq!(text, "LOWER('Foo')");
        assert!(params.is_empty());
    }

    #[test]
    fn test_lower_placeholder() {
        let (text, params) = render(&Expr::lower(Expr::lit("Foo")), RenderMode::Placeholder).unwrap();
        assert_eq!(text, "LOWER(:param1)");
        assert_eq!(params.len(), 1);
        assert_eq!(params["param1"], Value::from("Foo"));
    }

    #[test]
    fn test_current_time_has_empty_arguments() {
        for mode in [RenderMode::Inline, RenderMode::Placeholder] {
            let (text, params) = render(&Expr::CurrentTime, mode).unwrap();
            assert_eq!(text, "CURRENT_TIME()");
            assert!(params.is_empty());
        }
        assert_eq!(inline(&Expr::CurrentTimestamp), "CURRENT_TIMESTAMP()");
    }

    #[test]
    fn test_multi_argument_functions() {
        let concat = Expr::Concat(vec![Expr::path("a.first"), Expr::lit(" "), Expr::path("a.last")]);
        assert_eq!(inline(&concat), "CONCAT(a.first, ' ', a.last)");

        let substring = Expr::Substring {
            value: Box::new(Expr::path("b.title")),
            start: Box::new(Expr::lit(1)),
            length: Some(Box::new(Expr::lit(3))),
        };
        assert_eq!(inline(&substring), "SUBSTRING(b.title, 1, 3)");

        let nullif = Expr::NullIf {
            left: Box::new(Expr::path("b.price")),
            right: Box::new(Expr::lit(0)),
        };
        assert_eq!(inline(&nullif), "NULLIF(b.price, 0)");

        let coalesce = Expr::Coalesce(vec![Expr::path("b.subtitle"), Expr::lit("")]);
        assert_eq!(inline(&coalesce), "COALESCE(b.subtitle, '')");
    }

    #[test]
    fn test_aggregates() {
        let distinct = Expr::Aggregate {
            func: AggregateFunc::Count,
            distinct: true,
            value: Box::new(Expr::path("b.author")),
        };
        assert_eq!(inline(&distinct), "COUNT(DISTINCT b.author)");

        let max = Expr::Aggregate {
            func: AggregateFunc::Max,
            distinct: false,
            value: Box::new(Expr::path("b.price")),
        };
        assert_eq!(inline(&max), "MAX(b.price)");
    }

    #[test]
    fn test_database_function() {
        let expr = Expr::Function {
            name: "soundex".to_string(),
            args: vec![Expr::path("a.name")],
        };
        assert_eq!(inline(&expr), "FUNCTION('soundex', a.name)");

        let bare = Expr::Function {
            name: "now".to_string(),
            args: vec![],
        };
        assert_eq!(inline(&bare), "FUNCTION('now')");
    }

    #[test]
    fn test_custom_node_through_registered_call() {
        let expr = Expr::custom("soundex", vec![Expr::path("a.name")]);

        let err = render(&expr, RenderMode::Inline).unwrap_err();
        assert!(matches!(err, crate::error::RenderError::UnsupportedNodeKind(_)));

        let context = RenderContext::default().with_serializer(CallSerializer::new("soundex", "SOUNDEX"));
        let mut writer = JpqlWriter::new(crate::params::ParamResolver::new(RenderMode::Inline));
        context.serialize(&expr, &mut writer).unwrap();
        assert_eq!(writer.finish().unwrap().0, "SOUNDEX(a.name)");
    }

    #[test]
    fn test_call_serializer_rejects_other_kind() {
        let context = RenderContext::default()
            .with_override(NodeKind::UPPER, Arc::new(CallSerializer::new(NodeKind::LOWER, "LOWER")));
        let mut writer = JpqlWriter::new(crate::params::ParamResolver::new(RenderMode::Inline));
        let err = context
            .serialize(&Expr::upper(Expr::path("x")), &mut writer)
            .unwrap_err();
        assert!(matches!(err, crate::error::RenderError::SerializerMismatch { .. }));
    }
}
