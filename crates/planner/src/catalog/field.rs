use model::core::data_type::{SemanticType, SqlDialect};
use serde::Serialize;
use std::fmt;

/// Where a field's value physically lives in the entity's table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSource {
    /// A plain column.
    Column { column: String },
    /// A scalar at `path` inside a JSON document column.
    JsonScalar { column: String, path: Vec<String> },
    /// A JSON array of strings at `path`; `==` tests membership.
    JsonArray { column: String, path: Vec<String> },
    /// Boolean view of a status column: true when the column holds `value`.
    StatusFlag { column: String, value: String },
}

impl FieldSource {
    pub fn column(&self) -> &str {
        match self {
            FieldSource::Column { column }
            | FieldSource::JsonScalar { column, .. }
            | FieldSource::JsonArray { column, .. }
            | FieldSource::StatusFlag { column, .. } => column,
        }
    }

    pub fn json_path(&self) -> Option<&[String]> {
        match self {
            FieldSource::JsonScalar { path, .. } | FieldSource::JsonArray { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// String predicates callable as `name(field, "text")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StringFunction {
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "startsWith")]
    StartsWith,
    #[serde(rename = "endsWith")]
    EndsWith,
}

impl StringFunction {
    pub const ALL: [StringFunction; 3] = [
        StringFunction::Contains,
        StringFunction::StartsWith,
        StringFunction::EndsWith,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StringFunction::Contains => "contains",
            StringFunction::StartsWith => "startsWith",
            StringFunction::EndsWith => "endsWith",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for StringFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One identifier a filter may reference.
///
/// Descriptors are built with the constructors below and handed to
/// [`FieldCatalogBuilder`](super::FieldCatalogBuilder), which fills in the
/// owning table and validates every name that ends up in SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    pub table: String,
    pub source: FieldSource,
    pub functions: Vec<StringFunction>,
    /// Raw SQL that replaces the column expression for one dialect.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<(SqlDialect, String)>,
}

impl FieldDescriptor {
    fn new(name: &str, ty: SemanticType, source: FieldSource) -> Self {
        Self {
            name: name.to_string(),
            ty,
            table: String::new(),
            source,
            functions: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn column(name: &str, ty: SemanticType, column: &str) -> Self {
        Self::new(
            name,
            ty,
            FieldSource::Column {
                column: column.to_string(),
            },
        )
    }

    pub fn json(name: &str, ty: SemanticType, column: &str, path: &[&str]) -> Self {
        Self::new(
            name,
            ty,
            FieldSource::JsonScalar {
                column: column.to_string(),
                path: path.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    pub fn json_array(name: &str, column: &str, path: &[&str]) -> Self {
        Self::new(
            name,
            SemanticType::String,
            FieldSource::JsonArray {
                column: column.to_string(),
                path: path.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    pub fn status_flag(name: &str, column: &str, value: &str) -> Self {
        Self::new(
            name,
            SemanticType::Boolean,
            FieldSource::StatusFlag {
                column: column.to_string(),
                value: value.to_string(),
            },
        )
    }

    pub fn with_functions(mut self, functions: &[StringFunction]) -> Self {
        for function in functions {
            if !self.functions.contains(function) {
                self.functions.push(*function);
            }
        }
        self
    }

    pub fn with_override(mut self, dialect: SqlDialect, sql: &str) -> Self {
        self.overrides.retain(|(d, _)| *d != dialect);
        self.overrides.push((dialect, sql.to_string()));
        self
    }

    pub fn override_for(&self, dialect: SqlDialect) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(d, _)| *d == dialect)
            .map(|(_, sql)| sql.as_str())
    }

    pub fn supports(&self, function: StringFunction) -> bool {
        self.functions.contains(&function)
    }
}
