//! Predicates: comparisons, logical combinators and the membership tests.

use std::sync::Arc;

use super::{Serializer, mismatch, write_args, write_operand};
use crate::ast::{Expr, LogicalOp, NodeKind, Operand, Part, Precedence};
use crate::context::RenderContext;
use crate::error::{RenderError, RenderResult};
use crate::writer::JpqlWriter;

pub fn serializers() -> Vec<Arc<dyn Serializer>> {
    vec![
        Arc::new(ComparisonSerializer),
        Arc::new(LogicalSerializer::new(LogicalOp::And)),
        Arc::new(LogicalSerializer::new(LogicalOp::Or)),
        Arc::new(NotSerializer),
        Arc::new(LikeSerializer),
        Arc::new(BetweenSerializer),
        Arc::new(InSerializer),
        Arc::new(InSubquerySerializer),
        Arc::new(IsNullSerializer),
        Arc::new(IsEmptySerializer),
        Arc::new(MemberOfSerializer),
        Arc::new(ExistsSerializer),
    ]
}

/// Predicate operand; predicate operators do not associate.
fn write_strict(writer: &mut JpqlWriter<'_>, context: &RenderContext, operand: &Expr) -> RenderResult<()> {
    write_operand(writer, context, operand, Precedence::Predicate, Operand::Strict)
}

fn write_negatable(writer: &mut JpqlWriter<'_>, negated: bool, keyword: &str) {
    if negated {
        writer.write_keyword(&format!("NOT {}", keyword));
    } else {
        writer.write_keyword(keyword);
    }
}

pub struct ComparisonSerializer;

impl Serializer for ComparisonSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::COMPARISON
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Comparison { op, left, right }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        write_strict(writer, context, left)?;
        writer.write_keyword(op.as_str());
        write_strict(writer, context, right)
    }
}

/// N-ary AND or OR.
///
/// With no operands the combinator's identity is written (`1 = 1` for AND,
/// `0 = 1` for OR); a single operand is written on its own.
pub struct LogicalSerializer {
    op: LogicalOp,
}

impl LogicalSerializer {
    pub fn new(op: LogicalOp) -> Self {
        Self { op }
    }
}

impl Serializer for LogicalSerializer {
    fn handled_kind(&self) -> NodeKind {
        match self.op {
            LogicalOp::And => NodeKind::AND,
            LogicalOp::Or => NodeKind::OR,
        }
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Logical { op, operands }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        if *op != self.op {
            return Err(mismatch(self.handled_kind(), &part));
        }

        match operands.as_slice() {
            [] => {
                writer.write(op.identity());
                Ok(())
            }
            [only] => context.serialize(only, writer),
            _ => writer.write_each(operands, &format!(" {} ", op.as_str()), |w, operand| {
                write_operand(w, context, operand, op.precedence(), Operand::Chained)
            }),
        }
    }
}

pub struct NotSerializer;

impl Serializer for NotSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::NOT
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Not(predicate)) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write("NOT");
        writer.write_space();
        write_operand(writer, context, predicate, Precedence::Not, Operand::Left)
    }
}

pub struct LikeSerializer;

impl Serializer for LikeSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::LIKE
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Like {
            value,
            pattern,
            escape,
            negated,
        }) = part
        else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        write_strict(writer, context, value)?;
        write_negatable(writer, *negated, "LIKE");
        write_strict(writer, context, pattern)?;
        if let Some(escape) = escape {
            writer.write_keyword("ESCAPE");
            writer.write(&crate::params::quote(&escape.to_string()));
        }
        Ok(())
    }
}

pub struct BetweenSerializer;

impl Serializer for BetweenSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::BETWEEN
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Between {
            value,
            low,
            high,
            negated,
        }) = part
        else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        write_strict(writer, context, value)?;
        write_negatable(writer, *negated, "BETWEEN");
        write_strict(writer, context, low)?;
        writer.write_keyword("AND");
        write_strict(writer, context, high)
    }
}

/// `x IN (a, b)`; an empty list has no JPQL form and is rejected.
pub struct InSerializer;

impl Serializer for InSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::IN
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::In { value, list, negated }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        if list.is_empty() {
            return Err(RenderError::shape("IN predicate has an empty value list"));
        }
        write_strict(writer, context, value)?;
        write_negatable(writer, *negated, "IN");
        writer.write_parentheses(|w| write_args(w, context, list))
    }
}

pub struct InSubquerySerializer;

impl Serializer for InSubquerySerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::IN_SUBQUERY
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::InSubquery {
            value,
            subquery,
            negated,
        }) = part
        else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        write_strict(writer, context, value)?;
        write_negatable(writer, *negated, "IN");
        writer.write_parentheses(|w| context.serialize(&**subquery, w))
    }
}

pub struct IsNullSerializer;

impl Serializer for IsNullSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::IS_NULL
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::IsNull { value, negated }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        write_strict(writer, context, value)?;
        writer.write_keyword(if *negated { "IS NOT NULL" } else { "IS NULL" });
        Ok(())
    }
}

pub struct IsEmptySerializer;

impl Serializer for IsEmptySerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::IS_EMPTY
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, _: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::IsEmpty { path, negated }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write(&path.to_string());
        writer.write_keyword(if *negated { "IS NOT EMPTY" } else { "IS EMPTY" });
        Ok(())
    }
}

pub struct MemberOfSerializer;

impl Serializer for MemberOfSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::MEMBER_OF
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::MemberOf {
            value,
            collection,
            negated,
        }) = part
        else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        write_strict(writer, context, value)?;
        write_negatable(writer, *negated, "MEMBER OF");
        writer.write(&collection.to_string());
        Ok(())
    }
}

pub struct ExistsSerializer;

impl Serializer for ExistsSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::EXISTS
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Exists { subquery, negated }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write(if *negated { "NOT EXISTS" } else { "EXISTS" });
        writer.write_space();
        writer.write_parentheses(|w| context.serialize(&**subquery, w))
    }
}
