use filter_syntax::ast::span::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("unknown field '{name}' at {span}")]
    UnknownField { name: String, span: Span },

    #[error(
        "function '{name}' is not supported{} at {span}",
        .field.as_ref().map(|f| format!(" for field '{f}'")).unwrap_or_default()
    )]
    UnsupportedFunction {
        name: String,
        field: Option<String>,
        span: Span,
    },

    #[error("type mismatch at {span}: {message}")]
    TypeMismatch { message: String, span: Span },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::UnknownField { span, .. }
            | SemanticError::UnsupportedFunction { span, .. }
            | SemanticError::TypeMismatch { span, .. } => *span,
        }
    }

    pub(crate) fn mismatch(span: Span, message: impl Into<String>) -> Self {
        SemanticError::TypeMismatch {
            message: message.into(),
            span,
        }
    }
}
