pub mod dotpath;
pub mod expr;
pub mod literal;
pub mod operator;
pub mod span;
