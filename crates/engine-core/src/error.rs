use filter_syntax::{SyntaxError, lexer::error::LexerError, parser::error::ParseError};
use model::core::{data_type::SqlDialect, errors::ModelError};
use planner::bind::SemanticError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure of [`FilterEngine::compile`](crate::engine::FilterEngine::compile).
///
/// Stage errors are carried unchanged; use [`CompileError::kind`] to branch
/// without matching on nested variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexerError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(
        "unsupported SQL dialect{}",
        .name.as_ref().map(|n| format!(" '{n}'")).unwrap_or_else(|| ": none requested".to_string())
    )]
    UnsupportedDialect { name: Option<String> },

    #[error("no field catalog for entity '{0}'")]
    UnknownEntity(String),

    #[error("compilation was cancelled")]
    Cancelled,
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Lex(_) => ErrorKind::Lex,
            CompileError::Parse(e) if e.is_too_complex() => ErrorKind::TooComplex,
            CompileError::Parse(_) => ErrorKind::Parse,
            CompileError::Semantic(SemanticError::UnknownField { .. }) => ErrorKind::UnknownField,
            CompileError::Semantic(SemanticError::UnsupportedFunction { .. }) => {
                ErrorKind::UnsupportedFunction
            }
            CompileError::Semantic(SemanticError::TypeMismatch { .. }) => ErrorKind::TypeMismatch,
            CompileError::UnsupportedDialect { .. } => ErrorKind::UnsupportedDialect,
            CompileError::UnknownEntity(_) => ErrorKind::UnknownEntity,
            CompileError::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub(crate) fn dialect_not_enabled(dialect: SqlDialect) -> Self {
        CompileError::UnsupportedDialect {
            name: Some(dialect.to_string()),
        }
    }
}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::Lex(e) => CompileError::Lex(e),
            SyntaxError::Parse(e) => CompileError::Parse(e),
        }
    }
}

impl From<ModelError> for CompileError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownDialect(name) => {
                CompileError::UnsupportedDialect { name: Some(name) }
            }
            ModelError::UnknownEntity(name) => CompileError::UnknownEntity(name),
        }
    }
}

/// Flat discriminant of [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Lex,
    Parse,
    TooComplex,
    UnknownField,
    UnsupportedFunction,
    TypeMismatch,
    UnsupportedDialect,
    UnknownEntity,
    Cancelled,
}

impl ErrorKind {
    /// Whether the error is the user's expression being rejected, as opposed
    /// to a configuration problem or cancellation.
    pub fn is_invalid_filter(&self) -> bool {
        matches!(
            self,
            ErrorKind::Lex
                | ErrorKind::Parse
                | ErrorKind::TooComplex
                | ErrorKind::UnknownField
                | ErrorKind::UnsupportedFunction
                | ErrorKind::TypeMismatch
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Lex => "lex",
            ErrorKind::Parse => "parse",
            ErrorKind::TooComplex => "too_complex",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::UnsupportedFunction => "unsupported_function",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::UnsupportedDialect => "unsupported_dialect",
            ErrorKind::UnknownEntity => "unknown_entity",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
