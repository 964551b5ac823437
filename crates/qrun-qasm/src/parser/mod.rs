//! Parser for the `OpenQASM` subset.
//!
//! Statements are lowered straight into instructions while parsing; the
//! circuit is sized once every register has been seen.

mod expression;
mod statement;

use qrun_ir::{Circuit, Instruction, QubitId};
use rustc_hash::FxHashMap;

use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QASM source string into a Circuit.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()?;
    parser.into_circuit()
}

/// Upper bound on the total number of declared qubits.
pub const MAX_QUBITS: u32 = 1 << 16;

/// A declared quantum register, laid out contiguously.
#[derive(Debug, Clone, Copy)]
struct Register {
    offset: u32,
    size: u32,
}

/// Parser state.
pub(super) struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    qregs: FxHashMap<String, Register>,
    cregs: FxHashMap<String, u32>,
    num_qubits: u32,
    instructions: Vec<Instruction>,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> ParseResult<Self> {
        let tokens =
            tokenize(source).map_err(|(line, message)| ParseError::LexerError { line, message })?;

        Ok(Self {
            tokens,
            pos: 0,
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            num_qubits: 0,
            instructions: Vec::new(),
        })
    }

    /// Build the circuit from everything parsed so far.
    fn into_circuit(self) -> ParseResult<Circuit> {
        let mut circuit = Circuit::with_size("main", self.num_qubits);
        for instruction in self.instructions {
            circuit.push(instruction)?;
        }
        Ok(circuit)
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Peek `offset` tokens ahead of the current one.
    pub(super) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Build an "unexpected token" error at the current position.
    pub(super) fn unexpected(&self, expected: &str, found: Option<Token>) -> ParseError {
        match found {
            Some(token) => ParseError::UnexpectedToken {
                line: self.line(),
                expected: expected.into(),
                found: token.to_string(),
            },
            None => ParseError::UnexpectedEof(expected.into()),
        }
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<()> {
        self.expect(Token::OpenQasm)?;
        self.parse_version()?;
        self.expect(Token::Semicolon)?;

        while !self.is_eof() {
            self.parse_statement()?;
        }
        Ok(())
    }

    /// Parse the version number; only major versions 2 and 3 are accepted.
    fn parse_version(&mut self) -> ParseResult<()> {
        let major = match self.advance() {
            Some(Token::FloatLiteral(v)) => v.trunc() as u64,
            Some(Token::IntLiteral(v)) => v,
            other => return Err(self.unexpected("version number", other)),
        };
        if matches!(major, 2 | 3) {
            Ok(())
        } else {
            Err(ParseError::InvalidVersion(major.to_string()))
        }
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            other => Err(self.unexpected("identifier", other)),
        }
    }

    /// Parse an integer literal.
    pub(super) fn parse_int_literal(&mut self) -> ParseResult<u64> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Ok(v),
            other => Err(self.unexpected("integer", other)),
        }
    }

    /// Register a quantum register of `size` qubits.
    pub(super) fn declare_qreg(&mut self, name: String, size: u32) -> ParseResult<()> {
        if self.qregs.contains_key(&name) || self.cregs.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration(name));
        }
        let total = self
            .num_qubits
            .checked_add(size)
            .filter(|&total| total <= MAX_QUBITS)
            .ok_or_else(|| ParseError::InvalidExpression {
                line: self.line(),
                message: format!(
                    "register '{name}' brings the circuit past {MAX_QUBITS} qubits"
                ),
            })?;
        self.qregs.insert(
            name,
            Register {
                offset: self.num_qubits,
                size,
            },
        );
        self.num_qubits = total;
        Ok(())
    }

    /// Register a classical register. Only its name matters.
    pub(super) fn declare_creg(&mut self, name: String, size: u32) -> ParseResult<()> {
        if self.qregs.contains_key(&name) || self.cregs.contains_key(&name) {
            return Err(ParseError::DuplicateDeclaration(name));
        }
        self.cregs.insert(name, size);
        Ok(())
    }

    /// Resolve `name` or `name[index]` to the qubits it denotes.
    pub(super) fn resolve_qubits(&self, name: &str, index: Option<u64>) -> ParseResult<Vec<QubitId>> {
        let reg = self
            .qregs
            .get(name)
            .ok_or_else(|| ParseError::UndefinedRegister {
                line: self.line(),
                name: name.to_string(),
            })?;

        match index {
            Some(i) if i >= u64::from(reg.size) => Err(ParseError::IndexOutOfBounds {
                register: name.to_string(),
                index: i as usize,
                size: reg.size as usize,
            }),
            Some(i) => Ok(vec![QubitId(reg.offset + i as u32)]),
            None => Ok((0..reg.size).map(|i| QubitId(reg.offset + i)).collect()),
        }
    }

    /// Whether `name` is a declared classical register.
    pub(super) fn is_creg(&self, name: &str) -> bool {
        self.cregs.contains_key(name)
    }

    pub(super) fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub(super) fn all_qubits(&self) -> Vec<QubitId> {
        (0..self.num_qubits).map(QubitId).collect()
    }
}
