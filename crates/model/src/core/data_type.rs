use crate::core::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// SQL engines a filter can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    MySql,
    Postgres,
    Sqlite,
}

impl SqlDialect {
    pub const ALL: [SqlDialect; 3] = [SqlDialect::MySql, SqlDialect::Postgres, SqlDialect::Sqlite];

    pub fn name(&self) -> &'static str {
        match self {
            SqlDialect::MySql => "MySQL",
            SqlDialect::Postgres => "PostgreSQL",
            SqlDialect::Sqlite => "SQLite",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SqlDialect {
    type Err = ModelError;

    /// Accepts the driver names used by the store configuration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(SqlDialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(SqlDialect::Postgres),
            "sqlite" | "sqlite3" => Ok(SqlDialect::Sqlite),
            _ => Err(ModelError::UnknownDialect(s.to_string())),
        }
    }
}

/// Declared storage width of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericWidth {
    Int32,
    Int64,
    Float64,
}

impl NumericWidth {
    pub fn is_integral(&self) -> bool {
        matches!(self, NumericWidth::Int32 | NumericWidth::Int64)
    }
}

/// The type a filter field exposes to expressions, independent of how the
/// column is physically stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SemanticType {
    String,
    Number(NumericWidth),
    Boolean,
    Enum(EnumType),
    Timestamp,
}

impl SemanticType {
    /// Whether `<`, `<=`, `>` and `>=` are meaningful for this type.
    pub fn is_ordered(&self) -> bool {
        matches!(self, SemanticType::Number(_) | SemanticType::Timestamp)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::String => "string",
            SemanticType::Number(_) => "number",
            SemanticType::Boolean => "boolean",
            SemanticType::Enum(_) => "enum",
            SemanticType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Number(width) => write!(f, "number({width:?})"),
            SemanticType::Enum(e) => write!(f, "enum {}", e.name),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A closed set of string values, e.g. memo visibility.
///
/// Each variant has the literal users write in expressions and the value
/// stored in the database, with optional per-dialect replacements for the
/// stored value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumVariant {
    pub literal: String,
    pub stored: String,
    pub overrides: Vec<(SqlDialect, String)>,
}

impl EnumType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variants: Vec::new(),
        }
    }

    /// Adds a variant stored verbatim as its literal.
    pub fn variant(self, literal: &str) -> Self {
        self.variant_stored_as(literal, literal)
    }

    pub fn variant_stored_as(mut self, literal: &str, stored: &str) -> Self {
        self.variants.push(EnumVariant {
            literal: literal.to_string(),
            stored: stored.to_string(),
            overrides: Vec::new(),
        });
        self
    }

    /// Replaces the stored encoding of the most recently added variant for
    /// one dialect.
    pub fn stored_for(mut self, dialect: SqlDialect, stored: &str) -> Self {
        if let Some(last) = self.variants.last_mut() {
            last.overrides.retain(|(d, _)| *d != dialect);
            last.overrides.push((dialect, stored.to_string()));
        }
        self
    }

    pub fn resolve(&self, literal: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.literal == literal)
    }

    pub fn literals(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.literal.as_str()).collect()
    }
}

impl EnumVariant {
    pub fn encoding(&self, dialect: SqlDialect) -> &str {
        self.overrides
            .iter()
            .find(|(d, _)| *d == dialect)
            .map(|(_, stored)| stored.as_str())
            .unwrap_or(&self.stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_driver_name() {
        assert_eq!("mysql".parse::<SqlDialect>().unwrap(), SqlDialect::MySql);
        assert_eq!("Postgres".parse::<SqlDialect>().unwrap(), SqlDialect::Postgres);
        assert_eq!("postgresql".parse::<SqlDialect>().unwrap(), SqlDialect::Postgres);
        assert_eq!("sqlite3".parse::<SqlDialect>().unwrap(), SqlDialect::Sqlite);
        assert_eq!(
            "oracle".parse::<SqlDialect>(),
            Err(ModelError::UnknownDialect("oracle".to_string()))
        );
    }

    #[test]
    fn test_ordered_types() {
        assert!(SemanticType::Number(NumericWidth::Int32).is_ordered());
        assert!(SemanticType::Timestamp.is_ordered());
        assert!(!SemanticType::String.is_ordered());
        assert!(!SemanticType::Boolean.is_ordered());
    }

    #[test]
    fn test_enum_encoding_table() {
        let visibility = EnumType::new("visibility")
            .variant("PUBLIC")
            .variant_stored_as("PRIVATE", "private")
            .stored_for(SqlDialect::Postgres, "PRIVATE");

        let public = visibility.resolve("PUBLIC").unwrap();
        assert_eq!(public.encoding(SqlDialect::MySql), "PUBLIC");

        let private = visibility.resolve("PRIVATE").unwrap();
        assert_eq!(private.encoding(SqlDialect::Sqlite), "private");
        assert_eq!(private.encoding(SqlDialect::Postgres), "PRIVATE");

        assert!(visibility.resolve("public").is_none());
        assert_eq!(visibility.literals(), vec!["PUBLIC", "PRIVATE"]);
    }
}
