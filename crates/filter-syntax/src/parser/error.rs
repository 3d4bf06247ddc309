use crate::ast::span::Span;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("filter expression is empty")]
    EmptyExpression,

    #[error("unexpected token '{found}' at {span}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        span: Span,
    },

    #[error("expression ends unexpectedly at {span}, expected {expected}")]
    UnexpectedEnd { expected: &'static str, span: Span },

    #[error("parenthesis opened at {span} is never closed")]
    UnclosedParen { span: Span },

    #[error("unmatched ')' at {span}")]
    UnmatchedParen { span: Span },

    #[error("expression is too complex: {limit}")]
    TooComplex { limit: ComplexityLimit, span: Span },
}

impl ParseError {
    pub fn is_too_complex(&self) -> bool {
        matches!(self, ParseError::TooComplex { .. })
    }
}

/// Which guard rejected the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityLimit {
    Depth { limit: usize },
    Tokens { count: usize, limit: usize },
}

impl fmt::Display for ComplexityLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityLimit::Depth { limit } => {
                write!(f, "nesting deeper than {limit} levels")
            }
            ComplexityLimit::Tokens { count, limit } => {
                write!(f, "{count} tokens exceeds the limit of {limit}")
            }
        }
    }
}
