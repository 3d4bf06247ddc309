//! Lexer, parser and AST for the filter expression language.
//!
//! ```text
//! orExpr     := andExpr ('||' andExpr)*
//! andExpr    := unary ('&&' unary)*
//! unary      := '!' unary | comparison
//! comparison := primary (cmpOp primary)?
//! primary    := identifier | literal | functionCall | '(' orExpr ')'
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub(crate) mod grammar {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "grammar/filter.pest"]
    pub struct FilterGrammar;
}

pub use error::SyntaxError;
pub use lexer::tokenize;
pub use parser::{MAX_DEPTH_CEILING, ParserLimits, parse, parse_expression};
