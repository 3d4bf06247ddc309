//! Defines the core rendering trait and context for converting bound
//! filters to SQL.

use crate::query::dialect::Dialect;
use model::core::value::Value;

pub mod predicate;

/// A trait for any bound node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
    param_offset: usize,
}

impl<'a> Renderer<'a> {
    /// Numbers placeholders as if `param_offset` parameters were already
    /// bound ahead of this fragment.
    pub fn with_offset(dialect: &'a dyn Dialect, param_offset: usize) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
            param_offset,
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Value) {
        let placeholder = self.bind(value);
        self.sql.push_str(&placeholder);
    }

    /// Records a parameter and returns its placeholder without writing it,
    /// for dialect snippets that wrap the placeholder in SQL of their own.
    pub fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        self.dialect
            .get_placeholder(self.param_offset + self.params.len() - 1)
    }

    pub fn quote_column(&self, table: &str, column: &str) -> String {
        format!(
            "{}.{}",
            self.dialect.quote_identifier(table),
            self.dialect.quote_identifier(column)
        )
    }
}
