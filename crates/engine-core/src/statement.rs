use crate::error::CompileError;
use model::core::{data_type::SqlDialect, value::Value};
use serde::Serialize;
use std::collections::BTreeSet;

/// Per-call rendering settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderOptions {
    /// Target engine. Compiling without one fails before any parsing.
    pub dialect: Option<SqlDialect>,
    /// Parameters the caller binds before the fragment's own. Shifts numbered
    /// placeholders (`$n`); positional `?` placeholders are unaffected.
    pub param_offset: usize,
}

impl RenderOptions {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect: Some(dialect),
            param_offset: 0,
        }
    }

    /// Options for a store configured with `driver` (`mysql`, `postgres`,
    /// `sqlite`, ...).
    pub fn for_driver(driver: &str) -> Result<Self, CompileError> {
        Ok(Self::new(driver.parse()?))
    }

    pub fn with_param_offset(mut self, param_offset: usize) -> Self {
        self.param_offset = param_offset;
        self
    }
}

/// A parameterized SQL predicate ready to embed after `WHERE`.
///
/// `parameters` bind to the placeholders of `fragment` in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub fragment: String,
    pub parameters: Vec<Value>,
    pub referenced_fields: BTreeSet<String>,
}

impl CompiledStatement {
    pub fn references(&self, field: &str) -> bool {
        self.referenced_fields.contains(field)
    }
}
