//! Gate parameter expressions, evaluated to `f64` while parsing.

use super::Parser;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Parser {
    /// Parse and evaluate a parameter expression.
    pub(super) fn parse_expression(&mut self) -> ParseResult<f64> {
        let value = self.parse_binary_expr(0)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ParseError::InvalidExpression {
                line: self.line(),
                message: format!("expression evaluates to {value}"),
            })
        }
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<f64> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();

            // power is right-associative
            let next = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next)?;
            left = match op {
                BinOp::Add => left + right,
                BinOp::Sub => left - right,
                BinOp::Mul => left * right,
                BinOp::Div => left / right,
                BinOp::Pow => left.powf(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<f64> {
        if self.consume(&Token::Minus) {
            return Ok(-self.parse_unary_expr()?);
        }
        if self.consume(&Token::Plus) {
            return self.parse_unary_expr();
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> ParseResult<f64> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(v as f64)
            }
            Token::FloatLiteral(v) => {
                self.advance();
                Ok(v)
            }
            Token::Pi => {
                self.advance();
                Ok(std::f64::consts::PI)
            }
            Token::Tau => {
                self.advance();
                Ok(std::f64::consts::TAU)
            }
            Token::Euler => {
                self.advance();
                Ok(std::f64::consts::E)
            }
            Token::Identifier(name) => {
                self.advance();
                self.expect(Token::LParen)?;
                let arg = self.parse_binary_expr(0)?;
                self.expect(Token::RParen)?;
                self.apply_function(&name, arg)
            }
            Token::LParen => {
                self.advance();
                let value = self.parse_binary_expr(0)?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            other => Err(self.unexpected("expression", Some(other))),
        }
    }

    fn apply_function(&self, name: &str, arg: f64) -> ParseResult<f64> {
        let value = match name {
            "sin" => arg.sin(),
            "cos" => arg.cos(),
            "tan" => arg.tan(),
            "exp" => arg.exp(),
            "ln" => arg.ln(),
            "sqrt" => arg.sqrt(),
            _ => {
                return Err(ParseError::InvalidExpression {
                    line: self.line(),
                    message: format!("unknown function '{name}'"),
                });
            }
        };
        Ok(value)
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Power | Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Parse a comma-separated parameter list up to (not including) `)`.
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<f64>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut values = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            values.push(self.parse_expression()?);
        }
        Ok(values)
    }
}

fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 3,
    }
}
