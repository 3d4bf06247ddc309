//! Name resolution and type checking between the parser and the renderer.

pub mod binder;
pub mod bound;
pub mod error;
pub mod typecheck;

pub use binder::bind;
pub use bound::{BoundExpr, TypedValue};
pub use error::SemanticError;
pub use typecheck::typecheck;

#[cfg(test)]
mod tests;
