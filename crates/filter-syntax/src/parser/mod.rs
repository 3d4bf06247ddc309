//! Recursive-descent parser over the lexer's token stream.

use crate::{
    ast::{
        dotpath::DotPath,
        expr::{Expression, ExpressionKind},
        literal::Literal,
        operator::{BinaryOperator, ComparisonOperator, UnaryOperator},
        span::Span,
    },
    error::SyntaxError,
    lexer::{
        token::{Token, TokenKind},
        tokenize,
    },
    parser::error::{ComplexityLimit, ParseError},
};
use serde::{Deserialize, Serialize};

pub mod error;

pub const DEFAULT_MAX_DEPTH: usize = 128;
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// Hard ceiling on nesting depth. Parsing, binding and rendering all
/// recurse once per level, and deeper trees overflow a 2 MiB thread stack
/// in unoptimized builds. A configured `max_depth` above this is clamped.
pub const MAX_DEPTH_CEILING: usize = 160;

/// Guards against adversarial input. Both limits are checked before the
/// parser recurses past them.
///
/// Depth counts every level of the resulting tree that comes from `(`, `!`,
/// a function call or a chained `&&`/`||`, so a long flat chain of
/// connectives is bounded the same way as deep parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserLimits {
    pub max_depth: usize,
    pub max_tokens: usize,
}

impl ParserLimits {
    /// The depth limit the parser actually enforces.
    pub fn effective_depth(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_CEILING)
    }
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Parses a token stream produced by [`tokenize`].
pub fn parse(tokens: &[Token], limits: &ParserLimits) -> Result<Expression, ParseError> {
    Parser::new(tokens, limits).parse()
}

/// Tokenizes and parses `input` in one step.
pub fn parse_expression(input: &str, limits: &ParserLimits) -> Result<Expression, SyntaxError> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens, limits)?)
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    limits: &'t ParserLimits,
    eof: Token,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], limits: &'t ParserLimits) -> Self {
        let end = tokens.last().map(|t| t.span).unwrap_or_default();
        Self {
            tokens,
            pos: 0,
            depth: 0,
            limits,
            eof: Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                span: Span::new(end.end, end.end, end.line, end.column),
            },
        }
    }

    fn parse(mut self) -> Result<Expression, ParseError> {
        let count = self
            .tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .count();

        if count == 0 {
            return Err(ParseError::EmptyExpression);
        }
        if count > self.limits.max_tokens {
            return Err(ParseError::TooComplex {
                limit: ComplexityLimit::Tokens {
                    count,
                    limit: self.limits.max_tokens,
                },
                span: self.tokens[self.limits.max_tokens].span,
            });
        }

        let expr = self.parse_or()?;

        let next = self.peek();
        match next.kind {
            TokenKind::Eof => Ok(expr),
            TokenKind::RightParen => Err(ParseError::UnmatchedParen { span: next.span }),
            _ => Err(unexpected(next, "'&&', '||' or end of input")),
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self, span: Span) -> Result<(), ParseError> {
        self.depth += 1;
        let limit = self.limits.effective_depth();
        if self.depth > limit {
            return Err(ParseError::TooComplex {
                limit: ComplexityLimit::Depth { limit },
                span,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // orExpr := andExpr ('||' andExpr)*
    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_and()?;
        let mut chained = 0;

        while self.peek().kind == TokenKind::Or {
            let op = self.advance();
            self.enter(op.span)?;
            chained += 1;
            let right = self.parse_and()?;
            left = binary(left, BinaryOperator::Or, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    // andExpr := unary ('&&' unary)*
    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;
        let mut chained = 0;

        while self.peek().kind == TokenKind::And {
            let op = self.advance();
            self.enter(op.span)?;
            chained += 1;
            let right = self.parse_unary()?;
            left = binary(left, BinaryOperator::And, right);
        }

        self.depth -= chained;
        Ok(left)
    }

    // unary := '!' unary | comparison
    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if self.peek().kind != TokenKind::Not {
            return self.parse_comparison();
        }

        let bang = self.advance();
        self.enter(bang.span)?;
        let operand = self.parse_unary()?;
        self.leave();

        let span = bang.span.to(operand.span);
        Ok(Expression::new(
            ExpressionKind::Unary {
                operator: UnaryOperator::Not,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    // comparison := primary (cmpOp primary)?
    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_primary()?;

        let operator = match self.peek().kind {
            TokenKind::Equal => ComparisonOperator::Equal,
            TokenKind::NotEqual => ComparisonOperator::NotEqual,
            TokenKind::GreaterThan => ComparisonOperator::GreaterThan,
            TokenKind::LessThan => ComparisonOperator::LessThan,
            TokenKind::GreaterOrEqual => ComparisonOperator::GreaterOrEqual,
            TokenKind::LessOrEqual => ComparisonOperator::LessOrEqual,
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_primary()?;
        let span = left.span.to(right.span);
        Ok(Expression::new(
            ExpressionKind::Comparison {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }

    // primary := identifier | literal | functionCall | '(' orExpr ')'
    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.peek().clone();

        let literal = match &token.kind {
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::Integer(n) => Literal::Integer(*n),
            TokenKind::Decimal(n) => Literal::Decimal(*n),
            TokenKind::Boolean(b) => Literal::Boolean(*b),
            TokenKind::Identifier(name) => {
                self.advance();
                return Ok(Expression::new(
                    ExpressionKind::Identifier(DotPath::from_string(name, token.span)),
                    token.span,
                ));
            }
            TokenKind::FunctionCall(name) => return self.parse_call(name.clone()),
            TokenKind::LeftParen => return self.parse_group(),
            TokenKind::Eof => {
                return Err(ParseError::UnexpectedEnd {
                    expected: PRIMARY,
                    span: token.span,
                });
            }
            _ => return Err(unexpected(&token, PRIMARY)),
        };

        self.advance();
        Ok(Expression::new(ExpressionKind::Literal(literal), token.span))
    }

    fn parse_group(&mut self) -> Result<Expression, ParseError> {
        let open = self.advance();
        self.enter(open.span)?;
        let inner = self.parse_or()?;
        self.leave();

        let close = self.peek().clone();
        match close.kind {
            TokenKind::RightParen => {
                self.advance();
                Ok(inner)
            }
            TokenKind::Eof => Err(ParseError::UnclosedParen { span: open.span }),
            _ => Err(unexpected(&close, "')'")),
        }
    }

    // functionCall := name '(' (orExpr (',' orExpr)*)? ')'
    fn parse_call(&mut self, name: String) -> Result<Expression, ParseError> {
        let name_token = self.advance();
        let open = self.advance();
        if open.kind != TokenKind::LeftParen {
            return Err(unexpected(&open, "'('"));
        }
        self.enter(open.span)?;

        let mut arguments = Vec::new();
        let close = if self.peek().kind == TokenKind::RightParen {
            self.advance()
        } else {
            loop {
                arguments.push(self.parse_or()?);

                let next = self.advance();
                match next.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RightParen => break next,
                    TokenKind::Eof => return Err(ParseError::UnclosedParen { span: open.span }),
                    _ => return Err(unexpected(&next, "',' or ')'")),
                }
            }
        };
        self.leave();

        Ok(Expression::new(
            ExpressionKind::FunctionCall { name, arguments },
            name_token.span.to(close.span),
        ))
    }
}

const PRIMARY: &str = "a field, literal, function call or '('";

fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Expression {
    let span = left.span.to(right.span);
    Expression::new(
        ExpressionKind::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        },
        span,
    )
}

fn unexpected(token: &Token, expected: &'static str) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.kind.to_string(),
        expected,
        span: token.span,
    }
}
