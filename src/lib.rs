//! # jpql-render
//!
//! Renders typed JPQL query models into query text plus bound parameters.
//!
//! A query model ([`ast::Query`]) is walked by a [`context::RenderContext`],
//! a registry mapping every node kind to its [`serializer::Serializer`]. Any
//! kind can be overridden without touching the others, and literals are
//! either written inline or bound as `:paramN` placeholders depending on the
//! [`params::RenderMode`] given to each render call.
//!
//! ## Quick Example
//!
//! ```
//! use jpql_render::prelude::*;
//!
//! let b = EntityRef::new("Book", "b");
//! let query: Query = SelectQuery::new("Book", vec![Expr::entity(&b)], b.clone())
//!     .filter(Expr::lower(b.path("title")).equal(Expr::lit("dune")))
//!     .into();
//!
//! let result = jpql_render::render(&query, RenderMode::Inline).unwrap();
//! assert_eq!(result.query, "SELECT b FROM Book AS b WHERE LOWER(b.title) = 'dune'");
//! assert!(result.params.is_empty());
//! ```

pub mod ast;
pub mod config;
pub mod context;
pub mod error;
pub mod params;
pub mod renderer;
pub mod serializer;
pub mod writer;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::RenderConfig;
    pub use crate::context::RenderContext;
    pub use crate::error::*;
    pub use crate::params::{Params, RenderMode};
    pub use crate::renderer::{JpqlRenderer, RenderedResult};
    pub use crate::serializer::Serializer;
}

/// Render `query` with the default serializers.
pub fn render(query: &ast::Query, mode: params::RenderMode) -> error::RenderResult<renderer::RenderedResult> {
    renderer::JpqlRenderer::default().render(query, mode)
}
