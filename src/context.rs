//! Serializer registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::{NodeKind, Part};
use crate::error::{RenderError, RenderResult};
use crate::serializer::{self, Serializer};
use crate::writer::JpqlWriter;

/// Immutable lookup table from node kind to serializer.
///
/// Overrides produce a new context that shares the untouched entries with the
/// original; a context is never modified once built, so one instance can be
/// shared by any number of concurrent renders.
#[derive(Clone)]
pub struct RenderContext {
    serializers: Arc<HashMap<NodeKind, Arc<dyn Serializer>>>,
}

impl Default for RenderContext {
    /// Context with every built-in serializer registered.
    fn default() -> Self {
        Self::from_serializers(serializer::defaults())
    }
}

impl RenderContext {
    /// Context with no serializers at all.
    pub fn empty() -> Self {
        Self {
            serializers: Arc::new(HashMap::new()),
        }
    }

    /// Build a context, registering each serializer under its handled kind.
    ///
    /// Later entries replace earlier ones of the same kind.
    pub fn from_serializers<I>(serializers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Serializer>>,
    {
        let map = serializers
            .into_iter()
            .map(|s| (s.handled_kind(), s))
            .collect::<HashMap<_, _>>();
        Self {
            serializers: Arc::new(map),
        }
    }

    /// Derived context rendering `kind` with `serializer`.
    pub fn with_override(&self, kind: NodeKind, serializer: Arc<dyn Serializer>) -> Self {
        let mut map = (*self.serializers).clone();
        map.insert(kind, serializer);
        Self {
            serializers: Arc::new(map),
        }
    }

    /// Derived context with `serializer` registered under its handled kind.
    pub fn with_serializer<S>(&self, serializer: S) -> Self
    where
        S: Serializer + 'static,
    {
        self.with_override(serializer.handled_kind(), Arc::new(serializer))
    }

    /// Derived context with `kind` unregistered.
    pub fn without(&self, kind: &NodeKind) -> Self {
        let mut map = (*self.serializers).clone();
        map.remove(kind);
        Self {
            serializers: Arc::new(map),
        }
    }

    pub fn serializer_for(&self, kind: &NodeKind) -> RenderResult<&dyn Serializer> {
        self.serializers
            .get(kind)
            .map(|s| s.as_ref())
            .ok_or_else(|| RenderError::UnsupportedNodeKind(kind.clone()))
    }

    pub fn contains(&self, kind: &NodeKind) -> bool {
        self.serializers.contains_key(kind)
    }

    /// Registered kinds, sorted by name.
    pub fn kinds(&self) -> Vec<NodeKind> {
        let mut kinds: Vec<NodeKind> = self.serializers.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Render `part` with the serializer registered for its kind.
    ///
    /// This is the only way serializers reach each other.
    pub fn serialize<'a>(&self, part: impl Into<Part<'a>>, writer: &mut JpqlWriter<'_>) -> RenderResult<()> {
        let part = part.into();
        let kind = part.kind();
        tracing::trace!("serialize {}", kind);
        self.serializer_for(&kind)?.serialize(part, writer, self)
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("kinds", &self.kinds())
            .finish()
    }
}
