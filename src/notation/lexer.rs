//! Notation lexer
//!
//! Splits notation text into tokens so that later passes work on whole
//! identifiers rather than substrings. Whitespace is kept as tokens, so an
//! expansion reproduces the caller's spacing around everything it does not
//! rewrite.
//!
//! The lexer never fails: any character it does not recognise becomes a
//! [`Token::Punct`].

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, anychar, char, digit0, digit1, multispace1, one_of},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, tuple},
    IResult,
};

/// Reserved placeholder for "the current axis"
pub const DIM_KEYWORD: &str = "Dim";

/// A lexical token of the notation
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier: parameter, function name, literal axis name
    Ident(String),
    /// Bare `Dim` placeholder
    Dim,
    /// `Dim[i]` placeholder
    IndexedDim(usize),
    /// Resolved axis reference (produced during expansion, never by the lexer)
    Axis(usize),
    /// Numeric literal, kept as written
    Number(String),
    Space(String),
    /// Operators, brackets, commas, bars and anything else
    Punct(char),
}

impl Token {
    /// Whitespace carries no meaning for the expansion passes
    pub fn is_space(&self) -> bool {
        matches!(self, Token::Space(_))
    }
}

/// Token plus its byte offset in the original notation
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

impl Spanned {
    pub fn new(token: Token, offset: usize) -> Self {
        Self { token, offset }
    }
}

/// Tokenize notation text
pub fn tokenize(input: &str) -> Vec<Spanned> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        let offset = input.len() - rest.len();
        match token(rest) {
            Ok((next, tok)) => {
                tokens.push(Spanned::new(tok, offset));
                rest = next;
            }
            Err(_) => break,
        }
    }

    tokens
}

/// Check whether a string is a complete identifier
pub fn is_identifier(s: &str) -> bool {
    matches!(identifier(s), Ok(("", _)))
}

// ============================================================================
// Internal Parsers
// ============================================================================

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        indexed_dim,
        map(identifier, |id: &str| {
            if id == DIM_KEYWORD {
                Token::Dim
            } else {
                Token::Ident(id.to_string())
            }
        }),
        map(number, |n: &str| Token::Number(n.to_string())),
        map(multispace1, |s: &str| Token::Space(s.to_string())),
        map(anychar, Token::Punct),
    ))(input)
}

fn indexed_dim(input: &str) -> IResult<&str, Token> {
    map(
        delimited(pair(tag(DIM_KEYWORD), char('[')), digit1, char(']')),
        // Indices too large for usize are out of range for any table
        |digits: &str| Token::IndexedDim(digits.parse().unwrap_or(usize::MAX)),
    )(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}
