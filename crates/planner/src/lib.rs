//! Semantic half of the filter compiler: field catalogs, binding, type
//! checking and per-dialect SQL rendering.

pub mod bind;
pub mod catalog;
pub mod query;

pub use bind::{BoundExpr, SemanticError, TypedValue, bind, typecheck};
pub use catalog::{CatalogError, FieldCatalog, FieldDescriptor, FieldSource, StringFunction};
pub use query::renderer::predicate::render_predicate;
