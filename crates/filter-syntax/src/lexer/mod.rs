use crate::{
    ast::span::Span,
    grammar::{FilterGrammar, Rule},
    lexer::{
        error::LexerError,
        token::{Token, TokenKind},
    },
};
use pest::{
    Parser,
    error::{Error as PestError, InputLocation, LineColLocation},
    iterators::Pair,
};
use tracing::trace;

pub mod error;
pub mod token;

/// Tokenizes a filter expression. The returned sequence always ends with an
/// `Eof` token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
    Lexer::new().tokenize(input)
}

pub struct Lexer {
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new() -> Self {
        Lexer { tokens: Vec::new() }
    }

    pub fn tokenize(&mut self, input: &str) -> Result<Vec<Token>, LexerError> {
        self.tokens.clear();

        let pairs = FilterGrammar::parse(Rule::tokens, input).map_err(|e| rejected(input, &e))?;

        for pair in pairs.flat_map(|p| p.into_inner()) {
            self.process_pair(pair)?;
        }

        let (line, column) = end_position(input);
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: Span::new(input.len(), input.len(), line, column),
        });

        trace!(count = self.tokens.len(), "tokenized filter expression");
        Ok(std::mem::take(&mut self.tokens))
    }

    fn process_pair(&mut self, pair: Pair<Rule>) -> Result<(), LexerError> {
        let span = pair_to_span(&pair);
        let lexeme = pair.as_str();

        let kind = match pair.as_rule() {
            // Literals
            Rule::lit_string | Rule::bad_string => TokenKind::String(unescape(lexeme, span)?),
            Rule::open_string => return Err(LexerError::UnterminatedString { span }),
            Rule::lit_number => parse_number(lexeme, span)?,
            Rule::bad_number => {
                return Err(LexerError::InvalidNumber {
                    lexeme: lexeme.to_string(),
                    span,
                });
            }
            Rule::lit_boolean => TokenKind::Boolean(lexeme == "true"),

            // Identifiers
            Rule::fn_name => TokenKind::FunctionCall(lexeme.to_string()),
            Rule::ident => TokenKind::Identifier(lexeme.to_string()),

            // Operators
            Rule::op_eq => TokenKind::Equal,
            Rule::op_neq => TokenKind::NotEqual,
            Rule::op_gte => TokenKind::GreaterOrEqual,
            Rule::op_lte => TokenKind::LessOrEqual,
            Rule::op_gt => TokenKind::GreaterThan,
            Rule::op_lt => TokenKind::LessThan,
            Rule::op_and => TokenKind::And,
            Rule::op_or => TokenKind::Or,
            Rule::op_not => TokenKind::Not,

            // Delimiters
            Rule::lparen => TokenKind::LeftParen,
            Rule::rparen => TokenKind::RightParen,
            Rule::comma => TokenKind::Comma,

            Rule::illegal => {
                return Err(LexerError::IllegalCharacter {
                    character: lexeme.chars().next().unwrap_or('\0'),
                    span,
                });
            }

            _ => return Ok(()),
        };

        self.tokens.push(Token {
            kind,
            lexeme: lexeme.to_string(),
            span,
        });
        Ok(())
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}

fn pair_to_span(pair: &Pair<Rule>) -> Span {
    let (line, column) = pair.line_col();
    let span = pair.as_span();
    Span::new(span.start(), span.end(), line, column)
}

// `tokens` ends in a catch-all rule, so a pest failure can only point at
// the character where matching stopped.
fn rejected(input: &str, err: &PestError<Rule>) -> LexerError {
    let start = match err.location {
        InputLocation::Pos(pos) | InputLocation::Span((pos, _)) => pos,
    };
    let (line, column) = match err.line_col {
        LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => pos,
    };
    let character = input
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    LexerError::IllegalCharacter {
        character,
        span: Span::new(start, start + character.len_utf8(), line, column),
    }
}

fn end_position(input: &str) -> (usize, usize) {
    let line = input.matches('\n').count() + 1;
    let column = match input.rfind('\n') {
        Some(nl) => input[nl + 1..].chars().count() + 1,
        None => input.chars().count() + 1,
    };
    (line, column)
}

/// Span of `len` bytes at byte `offset` inside a lexeme that starts at `base`.
fn sub_span(base: Span, lexeme: &str, offset: usize, len: usize) -> Span {
    let before = &lexeme[..offset];
    let newlines = before.matches('\n').count();
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => base.column + before.chars().count(),
    };
    Span::new(
        base.start + offset,
        base.start + offset + len,
        base.line + newlines,
        column,
    )
}

fn parse_number(lexeme: &str, span: Span) -> Result<TokenKind, LexerError> {
    let invalid = || LexerError::InvalidNumber {
        lexeme: lexeme.to_string(),
        span,
    };

    if lexeme.contains('.') {
        lexeme
            .parse::<f64>()
            .map(TokenKind::Decimal)
            .map_err(|_| invalid())
    } else {
        lexeme
            .parse::<i64>()
            .map(TokenKind::Integer)
            .map_err(|_| invalid())
    }
}

/// Decodes the body of a quoted string lexeme (quotes included).
fn unescape(lexeme: &str, span: Span) -> Result<String, LexerError> {
    let body = &lexeme[1..lexeme.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        // Text parameters cannot carry NUL on every backend.
        if c == '\0' {
            return Err(LexerError::IllegalCharacter {
                character: c,
                span: sub_span(span, lexeme, idx + 1, 1),
            });
        }
        if c != '\\' {
            out.push(c);
            continue;
        }

        let invalid = |escape: String| LexerError::InvalidEscape {
            span: sub_span(span, lexeme, idx + 1, escape.len()),
            escape,
        };

        let decoded = match chars.next() {
            Some((_, '"')) => '"',
            Some((_, '\\')) => '\\',
            Some((_, '/')) => '/',
            Some((_, 'n')) => '\n',
            Some((_, 't')) => '\t',
            Some((_, 'r')) => '\r',
            Some((_, 'u')) => {
                let mut hex = String::with_capacity(4);
                while hex.len() < 4 {
                    match chars.peek() {
                        Some((_, h)) if h.is_ascii_hexdigit() => {
                            hex.push(*h);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .filter(|c| *c != '\0')
                    .ok_or_else(|| invalid(format!("\\u{hex}")))?
            }
            Some((_, other)) => return Err(invalid(format!("\\{other}"))),
            None => return Err(invalid("\\".to_string())),
        };
        out.push(decoded);
    }

    Ok(out)
}
