//! Tokenisation of source text.
//!
//! [`lex`] turns a source string into the flat token sequence consumed
//! by the parser. Between tokens, runs of whitespace are skipped; each
//! token is then recognised by its first character: punctuation, a
//! string literal, a numeric literal or an identifier. Operators such
//! as `+`, `-`, `<=` and `/=` are ordinary identifiers. A leading `-`
//! never starts a number, so `-5` is the identifier `-5`; unary
//! negation is not part of the grammar.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{opt, recognize, value},
    error::ErrorKind,
    sequence::pair,
};

use crate::Error;

/// A single lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `'`
    Quote,
    /// `` ` ``
    BackQuote,
    /// `,`
    Comma,
    /// `@`
    Atmark,
    /// Integer literal
    Integer(i64),
    /// Floating-point literal (digits, a dot, optional more digits)
    Number(f64),
    /// String literal without escape processing
    String(String),
    /// Identifier
    Identifier(String),
}

/// Characters that may start an identifier.
pub(crate) fn is_ident_head(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '+' | '-' | '*' | '/' | '=' | '<' | '>')
}

/// Characters that may continue an identifier.
pub(crate) fn is_ident_tail(c: char) -> bool {
    c.is_ascii_digit() || is_ident_head(c)
}

fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
        value(Token::Quote, char('\'')),
        value(Token::BackQuote, char('`')),
        value(Token::Comma, char(',')),
        value(Token::Atmark, char('@')),
    ))
    .parse(input)
}

/// A string literal runs from `"` to the next `"`. There are no escape
/// sequences; a missing closing quote is a hard lex failure.
fn string_literal(input: &str) -> IResult<&str, Token> {
    let (rest, _) = char('"').parse(input)?;
    let (rest, text) = take_while(|c: char| c != '"').parse(rest)?;
    let mut chars = rest.chars();
    match chars.next() {
        Some('"') => Ok((chars.as_str(), Token::String(text.to_owned()))),
        _ => Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::Char,
        ))),
    }
}

/// A maximal run of digits, optionally followed by `.` and a second
/// digit run. With a dot the literal is a `Number`, otherwise an
/// `Integer`. Out-of-range literals fail the lexer.
fn number(input: &str) -> IResult<&str, Token> {
    let (rest, literal) = recognize(pair(
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
    ))
    .parse(input)?;

    if literal.contains('.') {
        match literal.parse::<f64>() {
            Ok(n) => Ok((rest, Token::Number(n))),
            Err(_) => Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Float,
            ))),
        }
    } else {
        match literal.parse::<i64>() {
            Ok(n) => Ok((rest, Token::Integer(n))),
            Err(_) => Err(nom::Err::Failure(nom::error::Error::new(
                input,
                ErrorKind::Digit,
            ))),
        }
    }
}

fn identifier(input: &str) -> IResult<&str, Token> {
    let (rest, name) = take_while1(is_ident_tail).parse(input)?;
    if name.starts_with(is_ident_head) {
        Ok((rest, Token::Identifier(name.to_owned())))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::Alpha,
        )))
    }
}

fn token(input: &str) -> IResult<&str, Token> {
    // `number` must run before `identifier`: identifier tail characters
    // include digits, but an identifier may not start with one.
    alt((punctuation, string_literal, number, identifier)).parse(input)
}

/// Translate a nom failure into the crate error type, pointing at the
/// offending byte of the original input.
fn lex_error(input: &str, rest: &str, err: nom::Err<nom::error::Error<&str>>) -> Error {
    let offset = input.len() - rest.len();
    match err {
        nom::Err::Failure(e) if e.code == ErrorKind::Char => Error::Lex(format!(
            "unterminated string literal starting at byte {offset}"
        )),
        nom::Err::Failure(e) if e.code == ErrorKind::Digit || e.code == ErrorKind::Float => {
            Error::Lex(format!("numeric literal out of range at byte {offset}"))
        }
        _ => {
            let found = rest.chars().next().unwrap_or('?');
            Error::Lex(format!("unexpected character '{found}' found"))
        }
    }
}

/// Tokenise a complete source string.
pub fn lex(input: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        match token(rest) {
            Ok((after, tok)) => {
                tokens.push(tok);
                rest = after.trim_start();
            }
            Err(err) => return Err(lex_error(input, rest, err)),
        }
    }
    Ok(tokens)
}
