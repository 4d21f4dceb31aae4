//! Recursive descent parser for formula statements.
//!
//! One statement per line, terminator mandatory:
//!
//! ```text
//! statement      := EOF | (func_call | assignment) ';' EOF
//! assignment     := IDENT '=' (func_call | a_expr)
//! func_call      := IDENT '(' [arg (',' arg)*] ')'
//! arg            := LITERALSTR | a_expr
//! a_expr         := additive
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/') unary)*
//! unary          := '-' unary | primary
//! primary        := NUM [UNIT] | LITERALMV | IDENT | '(' a_expr ')'
//! ```

use emcalc_units::{decimal, MeasureValue};

use crate::ast::{BinaryOp, Node};
use crate::error::{Error, Result};
use crate::lexer::{parse_measure, Lexer};
use crate::token::{Token, TokenType};

pub struct Parser {
    lexer: Lexer,
    current: Token,
    peeked: Option<Token>,
}

impl Parser {
    pub fn new(input: impl Into<String>) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            peeked: None,
        }
    }

    fn advance(&mut self) {
        self.current = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
    }

    fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token());
        }
        self.peeked.as_ref().unwrap()
    }

    fn current_is(&self, token_type: TokenType) -> bool {
        self.current.token_type == token_type
    }

    fn expect(&mut self, token_type: TokenType, what: &str) -> Result<Token> {
        if self.current.token_type == token_type {
            let token = self.current.clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.syntax_error(what))
        }
    }

    fn syntax_error(&self, expected: &str) -> Error {
        let token = &self.current;
        match token.token_type {
            TokenType::Error => Error::Parse(format!("{} at byte {}", token.value, token.position)),
            TokenType::Eof => Error::Parse(format!("expected {expected}, found end of line")),
            _ => Error::Parse(format!(
                "expected {expected}, found '{}' at byte {}",
                token.value, token.position
            )),
        }
    }

    /// Parse one line. `None` means the line was empty.
    pub fn parse_statement(&mut self) -> Result<Option<Node>> {
        if self.current_is(TokenType::Eof) {
            return Ok(None);
        }
        if !self.current_is(TokenType::Ident) {
            return Err(self.syntax_error("a statement"));
        }
        let node = if self.peek().token_type == TokenType::OpenParen {
            self.parse_func_call()?
        } else {
            self.parse_assignment()?
        };
        self.expect(TokenType::Semicolon, "';'")?;
        if !self.current_is(TokenType::Eof) {
            return Err(self.syntax_error("end of line"));
        }
        Ok(Some(node))
    }

    fn parse_assignment(&mut self) -> Result<Node> {
        let target = self.expect(TokenType::Ident, "an identifier")?.value;
        self.expect(TokenType::Equal, "'='")?;
        let value =
            if self.current_is(TokenType::Ident) && self.peek().token_type == TokenType::OpenParen {
                self.parse_func_call()?
            } else {
                self.parse_expr()?
            };
        Ok(Node::Assignment {
            target,
            value: Box::new(value),
        })
    }

    fn parse_func_call(&mut self) -> Result<Node> {
        let name = self.expect(TokenType::Ident, "a function name")?.value;
        self.expect(TokenType::OpenParen, "'('")?;
        let mut args = Vec::new();
        if !self.current_is(TokenType::CloseParen) {
            loop {
                args.push(self.parse_func_arg()?);
                if self.current_is(TokenType::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenType::CloseParen, "')'")?;
        Ok(Node::FuncCall { name, args })
    }

    fn parse_func_arg(&mut self) -> Result<Node> {
        if self.current_is(TokenType::LiteralStr) {
            let value = self.current.value.clone();
            self.advance();
            return Ok(Node::LiteralString(value));
        }
        self.parse_expr()
    }

    fn parse_expr(&mut self) -> Result<Node> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Node> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current.token_type {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Node::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Node> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current.token_type {
                TokenType::Star => BinaryOp::Mul,
                TokenType::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Node::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node> {
        if self.current_is(TokenType::Minus) {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Node::Unary(Box::new(expr)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node> {
        match self.current.token_type {
            TokenType::Num => {
                let literal = self.current.value.clone();
                self.advance();
                let value = decimal::parse(&literal)?;
                if self.current_is(TokenType::Unit) {
                    let unit = self.current.value.clone();
                    self.advance();
                    Ok(Node::Measure(MeasureValue::with_unit(value, unit)))
                } else {
                    Ok(Node::Measure(MeasureValue::unitless(value)))
                }
            }
            TokenType::LiteralMv => {
                let literal = self.current.value.clone();
                self.advance();
                Ok(Node::Measure(parse_measure(&literal)?))
            }
            TokenType::Ident => {
                let name = self.current.value.clone();
                self.advance();
                Ok(Node::Variable(name))
            }
            TokenType::OpenParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenType::CloseParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.syntax_error("an expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Option<Node>> {
        Parser::new(input).parse_statement()
    }

    fn parse_ok(input: &str) -> Node {
        parse(input).unwrap().unwrap()
    }

    #[test]
    fn empty_line_has_no_statement() {
        assert!(parse("").unwrap().is_none());
        assert!(parse("   ").unwrap().is_none());
    }

    #[test]
    fn assignment_of_measure_literal() {
        let node = parse_ok("a = 1kg;");
        let Node::Assignment { target, value } = node else {
            panic!("expected assignment");
        };
        assert_eq!(target, "a");
        let Node::Measure(mv) = *value else {
            panic!("expected measure");
        };
        assert_eq!(mv.unit(), "kg");
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let node = parse_ok("x = a + b * c;");
        let Node::Assignment { value, .. } = node else {
            panic!("expected assignment");
        };
        let Node::Binary { op, rhs, .. } = *value else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            *rhs,
            Node::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn parens_regroup_without_a_node() {
        let node = parse_ok("x = (a + b) * c;");
        let Node::Assignment { value, .. } = node else {
            panic!("expected assignment");
        };
        let Node::Binary { op, lhs, .. } = *value else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Mul);
        assert!(matches!(
            *lhs,
            Node::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn unary_minus_nests() {
        let node = parse_ok("x = -a * b;");
        let Node::Assignment { value, .. } = node else {
            panic!("expected assignment");
        };
        // Unary binds to the left operand of the product.
        let Node::Binary { op, lhs, .. } = *value else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Mul);
        assert!(matches!(*lhs, Node::Unary(_)));
    }

    #[test]
    fn call_with_mixed_args() {
        let node = parse_ok(r#"f(a, 1kg, "1kg", "hello", 1 + 2);"#);
        let Node::FuncCall { name, args } = node else {
            panic!("expected call");
        };
        assert_eq!(name, "f");
        assert_eq!(args.len(), 5);
        assert!(matches!(args[0], Node::Variable(_)));
        assert!(matches!(args[1], Node::Measure(_)));
        assert!(matches!(args[2], Node::Measure(_))); // promoted literal
        assert!(matches!(args[3], Node::LiteralString(_)));
        assert!(matches!(args[4], Node::Binary { .. }));
    }

    #[test]
    fn assignment_from_call() {
        let node = parse_ok("a = f(b);");
        let Node::Assignment { value, .. } = node else {
            panic!("expected assignment");
        };
        assert!(matches!(*value, Node::FuncCall { .. }));
    }

    #[test]
    fn missing_terminator_is_an_error() {
        assert!(parse("print(a)").is_err());
        assert!(parse("a = 1kg").is_err());
    }

    #[test]
    fn trailing_tokens_are_an_error() {
        assert!(parse("a=1print(a);").is_err());
        assert!(parse("print(a); print(b);").is_err());
    }

    #[test]
    fn bare_unit_is_not_an_expression() {
        assert!(parse("kg = 1;").is_err());
        assert!(parse("a = kg;").is_err());
    }
}
