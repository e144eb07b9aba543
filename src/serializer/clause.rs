//! Clause parts: entity declarations, joins, sort items and assignments.

use std::sync::Arc;

use super::{Serializer, mismatch};
use crate::ast::{JoinTarget, NodeKind, NullOrder, Part, SortOrder};
use crate::context::RenderContext;
use crate::error::RenderResult;
use crate::writer::JpqlWriter;

pub fn serializers() -> Vec<Arc<dyn Serializer>> {
    vec![
        Arc::new(EntitySerializer),
        Arc::new(JoinSerializer),
        Arc::new(SortSerializer),
        Arc::new(AssignmentSerializer),
    ]
}

/// `Book AS b` in declaration position.
pub struct EntitySerializer;

impl Serializer for EntitySerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::ENTITY
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, _: &RenderContext) -> RenderResult<()> {
        let Part::Entity(entity) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write(&entity.name);
        writer.write_keyword("AS");
        writer.write(&entity.alias);
        Ok(())
    }
}

pub struct JoinSerializer;

impl Serializer for JoinSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::JOIN
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Join(join) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };

        writer.write(join.kind.keyword());
        writer.write_space();
        if join.fetch {
            writer.write("FETCH");
            writer.write_space();
        }
        match &join.target {
            JoinTarget::Entity(entity) => context.serialize(entity, writer)?,
            JoinTarget::Association { path, alias } => {
                writer.write(&path.to_string());
                writer.write_keyword("AS");
                writer.write(alias);
            }
        }
        if let Some(on) = &join.on {
            writer.write_keyword("ON");
            context.serialize(on, writer)?;
        }
        Ok(())
    }
}

pub struct SortSerializer;

impl Serializer for SortSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::SORT
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Sort(sort) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        context.serialize(&sort.expr, writer)?;
        writer.write_space();
        writer.write(match sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        });
        if let Some(nulls) = sort.nulls {
            writer.write_space();
            writer.write(match nulls {
                NullOrder::First => "NULLS FIRST",
                NullOrder::Last => "NULLS LAST",
            });
        }
        Ok(())
    }
}

/// `b.price = value` inside SET.
pub struct AssignmentSerializer;

impl Serializer for AssignmentSerializer {
    fn handled_kind(&self) -> NodeKind {
        NodeKind::ASSIGNMENT
    }

    fn serialize(&self, part: Part<'_>, writer: &mut JpqlWriter<'_>, context: &RenderContext) -> RenderResult<()> {
        let Part::Assignment(assignment) = part else {
            return Err(mismatch(self.handled_kind(), &part));
        };
        writer.write(&assignment.path.to_string());
        writer.write_keyword("=");
        context.serialize(&assignment.value, writer)
    }
}
