//! Value-producing expressions: literals, parameters, paths, arithmetic, CASE.

use std::sync::Arc;

use super::{Serializer, mismatch, write_operand};
use crate::ast::{ArithmeticOp, Expr, NodeKind, Operand, Part, Precedence, Value};
use crate::context::RenderContext;
use crate::error::RenderResult;
use crate::writer::JpqlWriter;

pub fn serializers() -> Vec<Arc<dyn Serializer>> {
    vec![
        Arc::new(LiteralSerializer),
        Arc::new(ParamSerializer),
        Arc::new(PathSerializer),
        Arc::new(EntityReferenceSerializer),
        Arc::new(AliasSerializer),
        Arc::new(ArithmeticSerializer),
        Arc::new(NegateSerializer),
        Arc::new(CaseSerializer),
        Arc::new(SubquerySerializer),
    ]
}

/// Literal values, inline or as generated placeholders.
pub struct LiteralSerializer;

impl Serializer for LiteralSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::LITERAL
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, _: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Literal(value)) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write_value(value)
    }
}

/// Named parameters declared in the model, always `:name`.
pub struct ParamSerializer;

impl Serializer for ParamSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::PARAM
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, _: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Param { name, value }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write_named_param(name, value.as_ref())
    }
}

pub struct PathSerializer;

impl Serializer for PathSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::PATH
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, _: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Path(path)) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write(&path.to_string());
        Ok(())
    }
}

/// An entity in value position renders as its alias.
pub struct EntityReferenceSerializer;

impl Serializer for EntityReferenceSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::ENTITY_REFERENCE
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, _: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Entity(entity)) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write(&entity.alias);
        Ok(())
    }
}

pub struct AliasSerializer;

impl Serializer for AliasSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::ALIAS
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Alias { value, alias }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        write_operand(writer, context, value, Precedence::Alias, Operand::Left)?;
        writer.write_keyword("AS");
        writer.write(alias);
        Ok(())
    }
}

pub struct ArithmeticSerializer;

impl Serializer for ArithmeticSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::ARITHMETIC
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Arithmetic { op, left, right }) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        let precedence = op.precedence();
        write_operand(writer, context, left, precedence, Operand::Left)?;
        writer.write_keyword(op.as_str());
        write_operand(writer, context, right, precedence, right_position(*op, right))
    }
}

/// `a + (b + c)` can drop its parentheses, `a - (b - c)` cannot.
fn right_position(op: ArithmeticOp, right: &Expr) -> Operand {
    match right {
        Expr::Arithmetic { op: inner, .. } if *inner == op && op.is_associative() => Operand::Chained,
        _ => Operand::Right,
    }
}

pub struct NegateSerializer;

impl Serializer for NegateSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::NEGATE
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Negate(value)) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write("-");
        // `--x` would read as a comment
        if is_negative_literal(value) {
            writer.write_parentheses(|w| context.serialize(&**value, w))
        } else {
            write_operand(writer, context, value, Precedence::Unary, Operand::Strict)
        }
    }
}

fn is_negative_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Value::Int(n)) => *n < 0,
        Expr::Literal(Value::Float(f)) => f.is_sign_negative(),
        _ => false,
    }
}

pub struct CaseSerializer;

impl Serializer for CaseSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::CASE
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Case {
            operand,
            whens,
            otherwise,
        }) = part
        else {
            return Err(mismatch(self.handled_kind(), &part));
        };

        writer.write("CASE");
        if let Some(operand) = operand {
            writer.write_space();
            context.serialize(&**operand, writer)?;
        }
        for when in whens {
            writer.write_keyword("WHEN");
            context.serialize(&when.condition, writer)?;
            writer.write_keyword("THEN");
            context.serialize(&when.result, writer)?;
        }
        if let Some(otherwise) = otherwise {
            writer.write_keyword("ELSE");
            context.serialize(&**otherwise, writer)?;
        }
        writer.write_keyword("END");
        Ok(())
    }
}

/// Scalar subquery, always parenthesized.
pub struct SubquerySerializer;

impl Serializer for SubquerySerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::SUBQUERY
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Expr(Expr::Subquery(query)) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write_parentheses(|w| context.serialize(&**query, w))
    }
}
