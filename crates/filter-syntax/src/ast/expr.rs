use crate::ast::{
    dotpath::DotPath,
    literal::Literal,
    operator::{BinaryOperator, ComparisonOperator, UnaryOperator},
    span::Span,
};

/// A node of the parsed filter. Trees are built bottom-up by the parser and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Expression { kind, span }
    }
}

/// Expression types
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Literal(Literal),
    Identifier(DotPath),
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Comparison {
        left: Box<Expression>,
        operator: ComparisonOperator,
        right: Box<Expression>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
}

impl ExpressionKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ExpressionKind::Literal(_) => "literal",
            ExpressionKind::Identifier(_) => "identifier",
            ExpressionKind::Binary { .. } => "boolean expression",
            ExpressionKind::Unary { .. } => "negation",
            ExpressionKind::Comparison { .. } => "comparison",
            ExpressionKind::FunctionCall { .. } => "function call",
        }
    }
}
