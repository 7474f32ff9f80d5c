//! Parsing token sequences into s-expression values.
//!
//! The grammar is the usual one for a quoted Lisp reader:
//!
//! ```text
//! expr    := atom | list | quote | bquote | comma | commaat
//! list    := '(' expr* ')'
//! quote   := '\'' expr
//! bquote  := '`' expr
//! comma   := ',' expr            (when not followed by '@')
//! commaat := ',' '@' expr
//! atom    := integer | number | string | identifier
//! ```
//!
//! `()` parses directly to `NIL`; a non-empty list becomes a chain of
//! cons cells. The quote prefixes wrap the following expression in the
//! matching [`Value`] wrapper without interpreting it.

use crate::Error;
use crate::MAX_PARSE_DEPTH;
use crate::ast::Value;
use crate::lexer::Token;

/// Parse a token sequence into the ordered top-level expressions.
pub fn parse(tokens: &[Token]) -> Result<Vec<Value>, Error> {
    let mut parser = Parser { tokens, pos: 0 };
    let mut exprs = Vec::new();
    while !parser.at_end() {
        exprs.push(parser.expression(0)?);
    }
    Ok(exprs)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expression(&mut self, depth: usize) -> Result<Value, Error> {
        if depth >= MAX_PARSE_DEPTH {
            return Err(Error::Parse(format!(
                "expression too deeply nested (max depth: {MAX_PARSE_DEPTH})"
            )));
        }

        let token = self
            .peek()
            .ok_or_else(|| Error::Parse("expected expression, but input ended".to_owned()))?;

        match token {
            Token::Integer(n) => {
                let value = Value::Integer(*n);
                self.pos += 1;
                Ok(value)
            }
            Token::Number(n) => {
                let value = Value::Number(*n);
                self.pos += 1;
                Ok(value)
            }
            Token::String(s) => {
                let value = Value::String(s.clone());
                self.pos += 1;
                Ok(value)
            }
            Token::Identifier(name) => {
                let value = Value::Symbol(name.clone());
                self.pos += 1;
                Ok(value)
            }
            Token::LParen => self.list(depth),
            Token::Quote => {
                self.pos += 1;
                let inner = self.expression(depth + 1)?;
                Ok(Value::Quoted(Box::new(inner)))
            }
            Token::BackQuote => {
                self.pos += 1;
                let inner = self.expression(depth + 1)?;
                Ok(Value::BackQuoted(Box::new(inner)))
            }
            Token::Comma => {
                self.pos += 1;
                let splicing = matches!(self.peek(), Some(Token::Atmark));
                if splicing {
                    self.pos += 1;
                }
                let inner = self.expression(depth + 1)?;
                if splicing {
                    Ok(Value::CommaAt(Box::new(inner)))
                } else {
                    Ok(Value::Comma(Box::new(inner)))
                }
            }
            Token::RParen => Err(Error::Parse(
                "unexpected token ) found: expected expression".to_owned(),
            )),
            Token::Atmark => Err(Error::Parse(
                "unexpected token @ found: expected expression".to_owned(),
            )),
        }
    }

    fn list(&mut self, depth: usize) -> Result<Value, Error> {
        self.pos += 1; // the '('
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(Error::Parse(
                        "unclosed list: expected ) before input ended".to_owned(),
                    ));
                }
                Some(Token::RParen) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => items.push(self.expression(depth + 1)?),
            }
        }
        Ok(Value::list(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{int, sym};
    use crate::lexer::lex;

    enum ParseTestResult {
        /// Parsing yields exactly one expression equal to this value
        Success(Value),
        /// Parsing yields one expression whose display form is this;
        /// the display form must also reparse to the same value
        RoundTrip(&'static str),
        /// Parsing fails with an error containing this text
        SpecificError(&'static str),
    }
    use ParseTestResult::*;

    fn parse_source(input: &str) -> Result<Vec<Value>, Error> {
        parse(&lex(input)?)
    }

    fn run_parse_tests(cases: Vec<(&str, ParseTestResult)>) {
        for (i, (input, expected)) in cases.iter().enumerate() {
            let test_id = format!("Parse test #{} ({input:?})", i + 1);
            match (parse_source(input), expected) {
                (Ok(exprs), Success(value)) => {
                    assert_eq!(exprs.len(), 1, "{test_id}: expected a single expression");
                    assert_eq!(&exprs[0], value, "{test_id}: value mismatch");
                }
                (Ok(exprs), RoundTrip(display)) => {
                    assert_eq!(exprs.len(), 1, "{test_id}: expected a single expression");
                    let printed = format!("{}", exprs[0]);
                    assert_eq!(&printed, display, "{test_id}: display mismatch");

                    let reparsed = parse_source(&printed)
                        .unwrap_or_else(|e| panic!("{test_id}: reparse of '{printed}' failed: {e}"));
                    assert_eq!(reparsed.len(), 1, "{test_id}: reparse count mismatch");
                    assert_eq!(
                        reparsed[0], exprs[0],
                        "{test_id}: round-trip value mismatch"
                    );
                }
                (Err(err), SpecificError(text)) => {
                    let msg = format!("{err}");
                    assert!(
                        msg.contains(text),
                        "{test_id}: error '{msg}' should contain '{text}'"
                    );
                }
                (Ok(exprs), SpecificError(text)) => {
                    panic!("{test_id}: expected error containing '{text}', got {exprs:?}")
                }
                (Err(err), _) => panic!("{test_id}: expected success, got {err}"),
            }
        }
    }

    #[test]
    fn test_parser_comprehensive() {
        let cases = vec![
            // Atoms
            ("42", Success(int(42))),
            ("2.5", Success(Value::Number(2.5))),
            ("\"hi\"", Success(Value::String("hi".into()))),
            ("foo", Success(sym("foo"))),
            ("+", Success(sym("+"))),
            // The empty list is NIL itself, not an empty cons chain
            ("()", Success(Value::Nil)),
            ("(   )", Success(Value::Nil)),
            // Lists
            ("(1)", Success(Value::list(vec![int(1)]))),
            (
                "(+ 1 2)",
                Success(Value::list(vec![sym("+"), int(1), int(2)])),
            ),
            (
                "(a (b c) ())",
                Success(Value::list(vec![
                    sym("a"),
                    Value::list(vec![sym("b"), sym("c")]),
                    Value::Nil,
                ])),
            ),
            // Quote prefixes
            ("'x", Success(Value::Quoted(Box::new(sym("x"))))),
            (
                "'(1 2)",
                Success(Value::Quoted(Box::new(Value::list(vec![
                    int(1),
                    int(2),
                ])))),
            ),
            ("`x", Success(Value::BackQuoted(Box::new(sym("x"))))),
            (",x", Success(Value::Comma(Box::new(sym("x"))))),
            (",@xs", Success(Value::CommaAt(Box::new(sym("xs"))))),
            (
                "`(a ,b ,@cs)",
                Success(Value::BackQuoted(Box::new(Value::list(vec![
                    sym("a"),
                    Value::Comma(Box::new(sym("b"))),
                    Value::CommaAt(Box::new(sym("cs"))),
                ])))),
            ),
            ("''x", Success(Value::Quoted(Box::new(Value::Quoted(
                Box::new(sym("x")),
            ))))),
            // Reader round-trips through Display
            ("(1 (2 3) \"s\")", RoundTrip("(1 (2 3) \"s\")")),
            ("'(a b)", RoundTrip("'(a b)")),
            ("`(a ,b ,@c)", RoundTrip("`(a ,b ,@c)")),
            ("( 1   2\t3 )", RoundTrip("(1 2 3)")),
            ("12.", RoundTrip("12.0")),
            // Errors
            ("(1 2", SpecificError("unclosed list")),
            (")", SpecificError("unexpected token )")),
            ("@x", SpecificError("unexpected token @")),
            ("'", SpecificError("input ended")),
            ("(", SpecificError("unclosed list")),
            (",", SpecificError("input ended")),
        ];
        run_parse_tests(cases);
    }

    #[test]
    fn test_multiple_top_level_forms() {
        let exprs = parse_source("1 2 (+ 1 2)").expect("parse");
        assert_eq!(exprs.len(), 3);
        assert_eq!(exprs[0], int(1));
        assert_eq!(exprs[1], int(2));
        assert_eq!(
            exprs[2],
            Value::list(vec![sym("+"), int(1), int(2)])
        );
    }

    #[test]
    fn test_parser_depth_limits() {
        let parens_under_limit = format!(
            "{}1{}",
            "(".repeat(MAX_PARSE_DEPTH - 1),
            ")".repeat(MAX_PARSE_DEPTH - 1)
        );
        let parens_at_limit = format!(
            "{}1{}",
            "(".repeat(MAX_PARSE_DEPTH + 1),
            ")".repeat(MAX_PARSE_DEPTH + 1)
        );
        let quotes_under_limit = format!("{}x", "'".repeat(MAX_PARSE_DEPTH - 1));
        let quotes_at_limit = format!("{}x", "'".repeat(MAX_PARSE_DEPTH + 1));

        assert!(parse_source(&parens_under_limit).is_ok());
        assert!(parse_source(&quotes_under_limit).is_ok());

        for input in [parens_at_limit, quotes_at_limit] {
            match parse_source(&input) {
                Err(Error::Parse(msg)) => {
                    assert!(msg.contains("too deeply nested"), "got: {msg}")
                }
                other => panic!("expected depth error, got {other:?}"),
            }
        }
    }
}
