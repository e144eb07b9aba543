//! Query model: the typed, immutable tree the renderer consumes.

pub mod expr;
pub mod kind;
pub mod operators;
pub mod query;
pub mod values;
pub mod visit;

pub use expr::*;
pub use kind::*;
pub use operators::*;
pub use query::*;
pub use values::*;
