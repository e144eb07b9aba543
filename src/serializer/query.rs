//! Query roots. Clause order is fixed here, whatever order the model was built in.

use std::sync::Arc;

use super::{Serializer, mismatch, write_args};
use crate::ast::{Expr, FromItem, NodeKind, Part};
use crate::context::RenderContext;
use crate::error::RenderResult;
use crate::writer::JpqlWriter;

pub fn serializers() -> Vec<Arc<dyn Serializer>> {
    vec![
        Arc::new(SelectQuerySerializer),
        Arc::new(UpdateQuerySerializer),
        Arc::new(DeleteQuerySerializer),
    ]
}

fn write_where(writer: &mut JpqlWriter<'_>, context: &RenderContext, predicate: Option<&Expr>) -> RenderResult<()> {
    if let Some(predicate) = predicate {
        writer.write_clause_keyword("WHERE");
        context.serialize(predicate, writer)?;
    }
    Ok(())
}

fn write_from_item(writer: &mut JpqlWriter<'_>, context: &RenderContext, item: &FromItem) -> RenderResult<()> {
    context.serialize(&item.entity, writer)?;
    for join in &item.joins {
        writer.write_space();
        context.serialize(join, writer)?;
    }
    Ok(())
}

/// `SELECT ... FROM ... [WHERE] [GROUP BY] [HAVING] [ORDER BY]`
pub struct SelectQuerySerializer;

impl Serializer for SelectQuerySerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::SELECT_QUERY
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Select(query) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };

        writer.write("SELECT");
        writer.write_space();
        if query.distinct {
            writer.write("DISTINCT");
            writer.write_space();
        }
        write_args(writer, context, &query.select)?;

        writer.write_clause_keyword("FROM");
        writer.write_each(&query.from, ", ", |w, item| write_from_item(w, context, item))?;

        write_where(writer, context, query.where_clause.as_ref())?;

        if !query.group_by.is_empty() {
            writer.write_clause_keyword("GROUP BY");
            write_args(writer, context, &query.group_by)?;
        }
        if let Some(having) = &query.having {
            writer.write_clause_keyword("HAVING");
            context.serialize(having, writer)?;
        }
        if !query.order_by.is_empty() {
            writer.write_clause_keyword("ORDER BY");
            writer.write_each(&query.order_by, ", ", |w, sort| context.serialize(sort, w))?;
        }
        Ok(())
    }
}

pub struct UpdateQuerySerializer;

impl Serializer for UpdateQuerySerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::UPDATE_QUERY
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Update(query) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };

        writer.write("UPDATE");
        writer.write_space();
        context.serialize(&query.entity, writer)?;
        writer.write_clause_keyword("SET");
        writer.write_each(&query.set, ", ", |w, assignment| context.serialize(assignment, w))?;
        write_where(writer, context, query.where_clause.as_ref())
    }
}

pub struct DeleteQuerySerializer;

impl Serializer for DeleteQuerySerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::DELETE_QUERY
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Delete(query) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };

        writer.write("DELETE FROM");
        writer.write_space();
        context.serialize(&query.entity, writer)?;
        write_where(writer, context, query.where_clause.as_ref())
    }
}
