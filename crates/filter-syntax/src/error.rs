use crate::{lexer::error::LexerError, parser::error::ParseError};
use thiserror::Error;

/// Failure of either front-end stage, for callers that lex and parse in one
/// step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexerError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
