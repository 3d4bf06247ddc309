//! Defines the `Dialect` trait for database-specific SQL syntax.

use crate::catalog::StringFunction;
use model::core::{
    data_type::{NumericWidth, SemanticType, SqlDialect},
    value::Value,
};

/// Everything the predicate renderer needs to know about one SQL engine.
///
/// Methods that build SQL receive column expressions and placeholders that
/// are already rendered. JSON path segments come from the catalog, which
/// restricts them to `[A-Za-z0-9_]`, so they are safe to inline.
pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - PostgreSQL and SQLite use double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for the zero-based parameter `index`.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL and SQLite use `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;

    fn kind(&self) -> SqlDialect;

    /// Boolean parameter in the form the engine stores booleans.
    fn encode_bool(&self, value: bool) -> Value;

    /// Forces a case-sensitive comparison of a string expression.
    fn case_sensitive(&self, expr: &str) -> String {
        expr.to_string()
    }

    /// Extracts a scalar of type `ty` from a JSON document column. Boolean
    /// extractions yield a predicate that is false when the key is missing.
    fn json_scalar(&self, column: &str, path: &[String], ty: &SemanticType) -> String;

    /// Predicate that is true when the JSON string array at `path` contains
    /// the bound parameter, and false (never NULL) otherwise.
    fn json_array_contains(&self, column: &str, path: &[String], placeholder: &str) -> String;

    /// Case-sensitive pattern match of `expr` against the bound pattern.
    fn string_match(&self, expr: &str, placeholder: &str) -> String;

    /// Builds the pattern bound for [`Dialect::string_match`], escaping any
    /// wildcard in `needle`.
    fn match_pattern(&self, function: StringFunction, needle: &str) -> String;
}

/// Maps the closed set of dialects to their renderers.
pub fn dialect_for(dialect: SqlDialect) -> &'static dyn Dialect {
    match dialect {
        SqlDialect::MySql => &MySql,
        SqlDialect::Postgres => &Postgres,
        SqlDialect::Sqlite => &Sqlite,
    }
}

// LIKE patterns use '!' as the escape character so backslash handling
// differences between engines don't matter.
const LIKE_ESCAPE: char = '!';

fn like_pattern(function: StringFunction, needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    wrap_pattern(function, &escaped, "%")
}

fn wrap_pattern(function: StringFunction, escaped: &str, wildcard: &str) -> String {
    match function {
        StringFunction::Contains => format!("{wildcard}{escaped}{wildcard}"),
        StringFunction::StartsWith => format!("{escaped}{wildcard}"),
        StringFunction::EndsWith => format!("{wildcard}{escaped}"),
    }
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{ident}""#)
    }

    fn get_placeholder(&self, index: usize) -> String {
        // PostgreSQL uses $1, $2, etc.
        format!("${}", index + 1)
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }

    fn kind(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    fn encode_bool(&self, value: bool) -> Value {
        Value::Boolean(value)
    }

    fn json_scalar(&self, column: &str, path: &[String], ty: &SemanticType) -> String {
        let text = format!("({column} #>> '{{{}}}')", path.join(","));
        match ty {
            SemanticType::Boolean => format!("(CAST({text} AS BOOLEAN) IS TRUE)"),
            SemanticType::Number(NumericWidth::Int32) => format!("CAST({text} AS INTEGER)"),
            SemanticType::Number(NumericWidth::Int64) | SemanticType::Timestamp => {
                format!("CAST({text} AS BIGINT)")
            }
            SemanticType::Number(NumericWidth::Float64) => {
                format!("CAST({text} AS DOUBLE PRECISION)")
            }
            SemanticType::String | SemanticType::Enum(_) => text,
        }
    }

    fn json_array_contains(&self, column: &str, path: &[String], placeholder: &str) -> String {
        format!(
            "COALESCE(({column} #> '{{{}}}') @> jsonb_build_array(CAST({placeholder} AS TEXT)), FALSE)",
            path.join(",")
        )
    }

    fn string_match(&self, expr: &str, placeholder: &str) -> String {
        format!("{expr} LIKE {placeholder} ESCAPE '{LIKE_ESCAPE}'")
    }

    fn match_pattern(&self, function: StringFunction, needle: &str) -> String {
        like_pattern(function, needle)
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#"`{ident}`"#)
    }

    fn get_placeholder(&self, _index: usize) -> String {
        // MySQL uses ?
        "?".into()
    }

    fn name(&self) -> String {
        "MySQL".into()
    }

    fn kind(&self) -> SqlDialect {
        SqlDialect::MySql
    }

    fn encode_bool(&self, value: bool) -> Value {
        Value::Int32(i32::from(value))
    }

    // The default collations are case-insensitive.
    fn case_sensitive(&self, expr: &str) -> String {
        format!("{expr} COLLATE utf8mb4_bin")
    }

    fn json_scalar(&self, column: &str, path: &[String], ty: &SemanticType) -> String {
        let extract = format!("JSON_EXTRACT({column}, '$.{}')", path.join("."));
        match ty {
            SemanticType::Boolean => format!("({extract} IS TRUE)"),
            SemanticType::String | SemanticType::Enum(_) => format!("JSON_UNQUOTE({extract})"),
            SemanticType::Number(_) | SemanticType::Timestamp => extract,
        }
    }

    fn json_array_contains(&self, column: &str, path: &[String], placeholder: &str) -> String {
        format!(
            "COALESCE(JSON_CONTAINS({column}, JSON_QUOTE({placeholder}), '$.{}'), 0)",
            path.join(".")
        )
    }

    fn string_match(&self, expr: &str, placeholder: &str) -> String {
        format!(
            "{} LIKE {placeholder} ESCAPE '{LIKE_ESCAPE}'",
            self.case_sensitive(expr)
        )
    }

    fn match_pattern(&self, function: StringFunction, needle: &str) -> String {
        like_pattern(function, needle)
    }
}

#[derive(Debug, Clone)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{ident}""#)
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> String {
        "SQLite".into()
    }

    fn kind(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn encode_bool(&self, value: bool) -> Value {
        Value::Int32(i32::from(value))
    }

    fn json_scalar(&self, column: &str, path: &[String], ty: &SemanticType) -> String {
        let extract = format!("json_extract({column}, '$.{}')", path.join("."));
        match ty {
            SemanticType::Boolean => format!("({extract} IS TRUE)"),
            _ => extract,
        }
    }

    fn json_array_contains(&self, column: &str, path: &[String], placeholder: &str) -> String {
        format!(
            "EXISTS (SELECT 1 FROM json_each({column}, '$.{}') WHERE json_each.value = {placeholder})",
            path.join(".")
        )
    }

    // LIKE is case-insensitive for ASCII in SQLite; GLOB is not.
    fn string_match(&self, expr: &str, placeholder: &str) -> String {
        format!("{expr} GLOB {placeholder}")
    }

    fn match_pattern(&self, function: StringFunction, needle: &str) -> String {
        let mut escaped = String::with_capacity(needle.len() + 2);
        for c in needle.chars() {
            match c {
                '*' | '?' | '[' => {
                    escaped.push('[');
                    escaped.push(c);
                    escaped.push(']');
                }
                _ => escaped.push(c),
            }
        }
        wrap_pattern(function, &escaped, "*")
    }
}
