//! Formula lexer.
//!
//! Single pass, left to right, over one statement line. Unit names are
//! tried before anything else through the catalog's longest-match
//! peek, so `kg/m3` lexes as one unit token instead of an identifier,
//! a slash and another unit. Quoted literals are reclassified after
//! the quotes are stripped: a known unit name becomes a unit token, a
//! measure spelling becomes a measure literal.

use emcalc_units::{catalog, decimal, MeasureValue};

use crate::error::{Error, Result};
use crate::token::{Token, TokenType};

pub struct Lexer {
    input: String,
    position: usize,
}

impl Lexer {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            position: 0,
        }
    }

    fn rest(&self) -> &str {
        &self.input[self.position..]
    }

    fn current(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.position + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(|c| c.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while self
            .current()
            .is_some_and(|c| c == b'_' || c.is_ascii_alphanumeric())
        {
            self.position += 1;
        }
        self.input[start..self.position].to_string()
    }

    /// `[0-9]*.?[0-9]+` with an optional `[eE][+-]?[0-9]+` exponent.
    fn read_number(&mut self) -> String {
        let start = self.position;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
        if self.current() == Some(b'.') && self.peek_byte(1).is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
            while self.current().is_some_and(|c| c.is_ascii_digit()) {
                self.position += 1;
            }
        }
        if matches!(self.current(), Some(b'e') | Some(b'E')) {
            let digits_at = if matches!(self.peek_byte(1), Some(b'+') | Some(b'-')) {
                2
            } else {
                1
            };
            // Only an actual exponent is consumed; `2Em` leaves the
            // `E` for the next token.
            if self.peek_byte(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                self.position += digits_at;
                while self.current().is_some_and(|c| c.is_ascii_digit()) {
                    self.position += 1;
                }
            }
        }
        self.input[start..self.position].to_string()
    }

    /// Read a double-quoted literal; no escape sequences.
    fn read_quoted(&mut self) -> Option<String> {
        let start = self.position + 1;
        let close = self.input.as_bytes()[start..]
            .iter()
            .position(|&c| c == b'"')?;
        let value = self.input[start..start + close].to_string();
        self.position = start + close + 1;
        Some(value)
    }

    fn classify_quoted(&self, value: String, position: usize) -> Token {
        if catalog().is_unit(&value) {
            // Bracketed alternates resolve too; emit the bare name.
            let name = value
                .strip_prefix('(')
                .and_then(|v| v.strip_suffix(')'))
                .unwrap_or(&value);
            return Token::new(TokenType::Unit, name, position);
        }
        if parse_measure(&value).is_ok() {
            return Token::new(TokenType::LiteralMv, value, position);
        }
        Token::new(TokenType::LiteralStr, value, position)
    }

    fn punct(&mut self, token_type: TokenType, text: &str, position: usize) -> Token {
        self.position += 1;
        Token::new(token_type, text, position)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let position = self.position;
        let Some(c) = self.current() else {
            return Token::eof(position);
        };

        // Unit names win over identifiers and numbers.
        if let Some(n) = catalog().peek(self.rest()) {
            let mut text = &self.input[position..position + n];
            self.position += n;
            if text.starts_with('(') {
                text = &text[1..text.len() - 1];
            }
            return Token::new(TokenType::Unit, text, position);
        }

        match c {
            b'+' => self.punct(TokenType::Plus, "+", position),
            b'-' => self.punct(TokenType::Minus, "-", position),
            b'*' => self.punct(TokenType::Star, "*", position),
            b'/' => self.punct(TokenType::Slash, "/", position),
            b'(' => self.punct(TokenType::OpenParen, "(", position),
            b')' => self.punct(TokenType::CloseParen, ")", position),
            b',' => self.punct(TokenType::Comma, ",", position),
            b';' => self.punct(TokenType::Semicolon, ";", position),
            b'=' => self.punct(TokenType::Equal, "=", position),
            b'"' => match self.read_quoted() {
                Some(value) => self.classify_quoted(value, position),
                None => {
                    self.position = self.input.len();
                    Token::error("unterminated string literal", position)
                }
            },
            _ if c == b'_' || c.is_ascii_alphabetic() => {
                let ident = self.read_identifier();
                Token::new(TokenType::Ident, ident, position)
            }
            _ if c.is_ascii_digit()
                || (c == b'.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())) =>
            {
                let number = self.read_number();
                Token::new(TokenType::Num, number, position)
            }
            _ => {
                self.position += 1;
                Token::error(format!("unexpected character '{}'", c as char), position)
            }
        }
    }
}

/// Parse a standalone measure literal: a number immediately followed
/// by a unit (`1kg`, `1.1E-04Gg/10^3m3`, `1(10^3m3)`).
pub fn parse_measure(s: &str) -> Result<MeasureValue> {
    let mut lexer = Lexer::new(s);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        match token.token_type {
            TokenType::Eof => break,
            TokenType::Error => return Err(Error::InvalidMeasure(s.to_string())),
            _ => tokens.push(token),
        }
    }
    // Any unit may be written in parentheses next to the number, not
    // only the digit-leading names the catalog brackets itself.
    match tokens.as_slice() {
        [num, unit] if num.token_type == TokenType::Num && unit.token_type == TokenType::Unit => {
            let value = decimal::parse(&num.value)?;
            Ok(MeasureValue::with_unit(value, unit.value.clone()))
        }
        [num, open, unit, close]
            if num.token_type == TokenType::Num
                && open.token_type == TokenType::OpenParen
                && unit.token_type == TokenType::Unit
                && close.token_type == TokenType::CloseParen =>
        {
            let value = decimal::parse(&num.value)?;
            Ok(MeasureValue::with_unit(value, unit.value.clone()))
        }
        _ => Err(Error::InvalidMeasure(s.to_string())),
    }
}

/// Parse a caller-supplied variable binding: a plain decimal becomes a
/// unitless scalar, anything else must be a measure literal.
pub fn parse_variable_value(s: &str) -> Result<MeasureValue> {
    match decimal::parse(s) {
        Ok(value) => Ok(MeasureValue::unitless(value)),
        Err(_) => parse_measure(s),
    }
}
