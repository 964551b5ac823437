//! Error types for the QASM reader.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Register used before declaration.
    #[error("Undefined register at line {line}: {name}")]
    UndefinedRegister { line: usize, name: String },

    /// Duplicate declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Unknown gate name.
    #[error("Unknown gate at line {line}: {name}")]
    UnknownGate { line: usize, name: String },

    /// Wrong number of qubit operands.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Wrong number of parameters.
    #[error("Gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// Broadcast over registers of different sizes.
    #[error("Register size mismatch in broadcast at line {line}: {sizes:?}")]
    RegisterSizeMismatch { line: usize, sizes: Vec<usize> },

    /// Construct the reader does not support.
    #[error("Unsupported statement at line {line}: {what}")]
    Unsupported { line: usize, what: String },

    /// Parameter expression error.
    #[error("Invalid expression at line {line}: {message}")]
    InvalidExpression { line: usize, message: String },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] qrun_ir::IrError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
