//! Statement parsing.

use qrun_ir::{Instruction, QubitId, StandardGate};

use super::Parser;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a single statement and lower it into instructions.
    pub(super) fn parse_statement(&mut self) -> ParseResult<()> {
        let line = self.line();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qreg => self.parse_qreg(),
            Token::Creg => self.parse_creg(),
            Token::Qubit => self.parse_qubit_decl(),
            Token::Bit => self.parse_bit_decl(),
            Token::Measure => self.parse_measure(),
            Token::Barrier => self.parse_barrier(),
            Token::Gate | Token::Opaque => Err(ParseError::Unsupported {
                line,
                what: "gate definitions".into(),
            }),
            Token::If | Token::For => Err(ParseError::Unsupported {
                line,
                what: "classical control flow".into(),
            }),
            Token::Reset => Err(ParseError::Unsupported {
                line,
                what: "reset".into(),
            }),
            Token::Identifier(name) => {
                if self.is_measure_assignment() {
                    self.parse_measure_assignment()
                } else {
                    self.parse_gate_call(&name)
                }
            }
            other => Err(self.unexpected("statement", Some(other))),
        }
    }

    /// `include "file";` is accepted and ignored.
    fn parse_include(&mut self) -> ParseResult<()> {
        self.expect(Token::Include)?;
        match self.advance() {
            Some(Token::StringLiteral(_)) => {}
            other => return Err(self.unexpected("string literal", other)),
        }
        self.expect(Token::Semicolon)
    }

    /// `qreg name[size];`
    fn parse_qreg(&mut self) -> ParseResult<()> {
        self.expect(Token::Qreg)?;
        let name = self.parse_identifier()?;
        let size = self.parse_designator()?;
        self.declare_qreg(name, size)?;
        self.expect(Token::Semicolon)
    }

    /// `creg name[size];`
    fn parse_creg(&mut self) -> ParseResult<()> {
        self.expect(Token::Creg)?;
        let name = self.parse_identifier()?;
        let size = self.parse_designator()?;
        self.expect(Token::Semicolon)?;
        self.declare_creg(name, size)
    }

    /// `qubit name;` or `qubit[size] name;`
    fn parse_qubit_decl(&mut self) -> ParseResult<()> {
        self.expect(Token::Qubit)?;
        let size = self.parse_optional_designator()?;
        let name = self.parse_identifier()?;
        self.declare_qreg(name, size)?;
        self.expect(Token::Semicolon)
    }

    /// `bit name;` or `bit[size] name;`, optionally initialized by a measurement.
    fn parse_bit_decl(&mut self) -> ParseResult<()> {
        self.expect(Token::Bit)?;
        let size = self.parse_optional_designator()?;
        let name = self.parse_identifier()?;
        self.declare_creg(name, size)?;
        if self.consume(&Token::Eq) {
            self.expect(Token::Measure)?;
            self.emit_measurements()?;
        }
        self.expect(Token::Semicolon)
    }

    /// `[size]`
    fn parse_designator(&mut self) -> ParseResult<u32> {
        self.expect(Token::LBracket)?;
        let line = self.line();
        let size = self.parse_int_literal()?;
        self.expect(Token::RBracket)?;
        u32::try_from(size).map_err(|_| ParseError::InvalidExpression {
            line,
            message: format!("register size {size} is too large"),
        })
    }

    fn parse_optional_designator(&mut self) -> ParseResult<u32> {
        if self.check(&Token::LBracket) {
            self.parse_designator()
        } else {
            Ok(1)
        }
    }

    /// `name` or `name[index]`.
    fn parse_operand(&mut self) -> ParseResult<(String, Option<u64>)> {
        let name = self.parse_identifier()?;
        let index = if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok((name, index))
    }

    fn parse_qubit_operand(&mut self) -> ParseResult<Vec<QubitId>> {
        let (name, index) = self.parse_operand()?;
        self.resolve_qubits(&name, index)
    }

    /// Classical target of a measurement; must name a declared bit register.
    fn parse_bit_operand(&mut self) -> ParseResult<()> {
        let line = self.line();
        let (name, _) = self.parse_operand()?;
        if self.is_creg(&name) {
            Ok(())
        } else {
            Err(ParseError::UndefinedRegister { line, name })
        }
    }

    /// Read a qubit operand and emit one measurement per qubit.
    fn emit_measurements(&mut self) -> ParseResult<()> {
        for qubit in self.parse_qubit_operand()? {
            self.emit(Instruction::measure(qubit));
        }
        Ok(())
    }

    /// `measure q;` or `measure q -> c;`
    fn parse_measure(&mut self) -> ParseResult<()> {
        self.expect(Token::Measure)?;
        self.emit_measurements()?;
        if self.consume(&Token::Arrow) {
            self.parse_bit_operand()?;
        }
        self.expect(Token::Semicolon)
    }

    /// Lookahead for `c = measure ...` and `c[i] = measure ...`.
    fn is_measure_assignment(&self) -> bool {
        match self.peek_at(1) {
            Some(Token::Eq) => true,
            Some(Token::LBracket) => {
                matches!(self.peek_at(2), Some(Token::IntLiteral(_)))
                    && matches!(self.peek_at(3), Some(Token::RBracket))
                    && matches!(self.peek_at(4), Some(Token::Eq))
            }
            _ => false,
        }
    }

    fn parse_measure_assignment(&mut self) -> ParseResult<()> {
        self.parse_bit_operand()?;
        self.expect(Token::Eq)?;
        self.expect(Token::Measure)?;
        self.emit_measurements()?;
        self.expect(Token::Semicolon)
    }

    /// `barrier;` covers every qubit declared so far.
    fn parse_barrier(&mut self) -> ParseResult<()> {
        self.expect(Token::Barrier)?;
        let qubits = if self.check(&Token::Semicolon) {
            self.all_qubits()
        } else {
            let mut qubits = self.parse_qubit_operand()?;
            while self.consume(&Token::Comma) {
                qubits.extend(self.parse_qubit_operand()?);
            }
            qubits
        };
        self.expect(Token::Semicolon)?;
        self.emit(Instruction::barrier(qubits));
        Ok(())
    }

    /// `name(params) operands;` with register broadcast.
    fn parse_gate_call(&mut self, raw_name: &str) -> ParseResult<()> {
        let line = self.line();
        self.advance();

        // QASM 2 spells the builtins in upper case
        let name = match raw_name {
            "U" => "u".to_string(),
            "CX" => "cx".to_string(),
            other => other.to_string(),
        };

        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            Vec::new()
        };

        let mut operands = vec![self.parse_qubit_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_qubit_operand()?);
        }
        self.expect(Token::Semicolon)?;

        let expected = StandardGate::expected_parameters(&name).ok_or_else(|| {
            ParseError::UnknownGate {
                line,
                name: raw_name.to_string(),
            }
        })?;
        if expected != params.len() {
            return Err(ParseError::WrongParameterCount {
                gate: name,
                expected,
                got: params.len(),
            });
        }
        let gate = StandardGate::from_name(&name, &params).ok_or_else(|| {
            ParseError::UnknownGate {
                line,
                name: raw_name.to_string(),
            }
        })?;

        let arity = gate.num_qubits() as usize;
        if operands.len() != arity {
            return Err(ParseError::WrongQubitCount {
                gate: name,
                expected: arity,
                got: operands.len(),
            });
        }

        for qubits in broadcast(&operands, line)? {
            self.emit(Instruction::gate(gate.clone(), qubits));
        }
        Ok(())
    }
}

/// Expand register operands into one qubit tuple per application.
///
/// Single-qubit operands are repeated; whole registers are zipped and must
/// share a size.
fn broadcast(operands: &[Vec<QubitId>], line: usize) -> ParseResult<Vec<Vec<QubitId>>> {
    let sizes: Vec<usize> = operands.iter().map(Vec::len).collect();
    let width = sizes.iter().copied().filter(|&s| s != 1).max().unwrap_or(1);

    if sizes.iter().any(|&s| s != 1 && s != width) {
        return Err(ParseError::RegisterSizeMismatch { line, sizes });
    }

    Ok((0..width)
        .map(|i| {
            operands
                .iter()
                .map(|op| if op.len() == 1 { op[0] } else { op[i] })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_scalar_operands() {
        let ops = vec![vec![QubitId(0)], vec![QubitId(1)]];
        let out = broadcast(&ops, 1).unwrap();
        assert_eq!(out, vec![vec![QubitId(0), QubitId(1)]]);
    }

    #[test]
    fn test_broadcast_register_with_scalar() {
        let ops = vec![vec![QubitId(0)], vec![QubitId(1), QubitId(2)]];
        let out = broadcast(&ops, 1).unwrap();
        assert_eq!(
            out,
            vec![vec![QubitId(0), QubitId(1)], vec![QubitId(0), QubitId(2)]]
        );
    }

    #[test]
    fn test_broadcast_mismatch() {
        let ops = vec![vec![QubitId(0), QubitId(1)], vec![QubitId(2), QubitId(3), QubitId(4)]];
        assert!(broadcast(&ops, 7).is_err());
    }
}
