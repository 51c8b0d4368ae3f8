//! Tokenizer: splits a calculator expression into classified tokens.
//!
//! Whitespace is skipped. A leading `-` is never part of a number; negation is
//! decided by the parser so that `3-2` and `3 + -2` both come out right.
//! Positions are counted in characters, not bytes, so that an error in
//! `2×π$` points at `$` even though `×` and `π` are multi-byte.
//!
//! A name is a run of letters read whole, so `pix` and `sinx` are single
//! (unknown) names; write `pi x` and `sin(x)`. The one exception is `π`, which
//! is always a token of its own: `2πx` and `xπ` multiply as expected.
use crate::expression::errors::LexError;
use log::trace;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, opt, recognize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Operator,
    LeftParen,
    RightParen,
    Comma,
}

/// A lexical unit and the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    /// Offset just past the last character of the token.
    pub fn end(&self) -> usize {
        self.position + self.text.chars().count()
    }
}

/// digits with an optional fraction and an optional exponent: `12`, `1.5`, `.5`, `5.`, `1.2E-3`
fn number(input: &str) -> IResult<&str, &str> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ));
    // the exponent is only taken when digits follow, so `2e` stays `2` times `e`
    let exponent = (one_of("eE"), opt(one_of("+-")), digit1);
    recognize((mantissa, opt(exponent))).parse(input)
}

/// a run of letters; `π` always stands alone so `2πx` reads as `2·π·x`
fn identifier(input: &str) -> IResult<&str, &str> {
    alt((tag("π"), take_while1(|c: char| c.is_alphabetic() && c != 'π'))).parse(input)
}

fn operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag("**"),
        tag("+"),
        tag("-"),
        tag("*"),
        tag("/"),
        tag("^"),
        tag("%"),
        tag("×"),
        tag("÷"),
    ))
    .parse(input)
}

fn token(input: &str) -> IResult<&str, (TokenKind, &str)> {
    alt((
        map(number, |t: &str| (TokenKind::Number, t)),
        map(identifier, |t: &str| (TokenKind::Identifier, t)),
        map(operator, |t: &str| (TokenKind::Operator, t)),
        map(tag("("), |t: &str| (TokenKind::LeftParen, t)),
        map(tag(")"), |t: &str| (TokenKind::RightParen, t)),
        map(tag(","), |t: &str| (TokenKind::Comma, t)),
    ))
    .parse(input)
}

/// Turns `source` into tokens, or reports the first character that starts none.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut position = 0;

    loop {
        let trimmed = rest.trim_start();
        position += rest[..rest.len() - trimmed.len()].chars().count();
        rest = trimmed;

        let Some(first) = rest.chars().next() else {
            break;
        };
        let Ok((remaining, (kind, text))) = token(rest) else {
            return Err(LexError {
                position,
                unexpected: first,
            });
        };
        let len = text.chars().count();
        if kind == TokenKind::Number && remaining.starts_with('.') {
            // second decimal point, as in `1.2.3`
            return Err(LexError {
                position: position + len,
                unexpected: '.',
            });
        }
        tokens.push(Token {
            kind,
            text: text.to_string(),
            position,
        });
        position += len;
        rest = remaining;
    }

    trace!("tokenized {:?} into {} tokens", source, tokens.len());
    Ok(tokens)
}
