//! `OpenQASM` reader for qrun
//!
//! Turns circuit text into a [`qrun_ir::Circuit`]. Both the 2.0 and 3.0
//! spellings of the common subset are accepted, which covers the circuit
//! files simulation runs are usually driven from.
//!
//! # Supported Features
//!
//! | Feature | Example |
//! |---------|---------|
//! | Version declaration | `OPENQASM 2.0;`, `OPENQASM 3;` |
//! | Includes (ignored) | `include "qelib1.inc";` |
//! | Quantum registers | `qreg q[5];`, `qubit[5] q;`, `qubit a;` |
//! | Classical registers (ignored) | `creg c[5];`, `bit[5] c;` |
//! | Gate calls | `h q[0];`, `cx q[0], q[1];`, `rx(pi/4) q[0];` |
//! | Register broadcast | `h q;`, `cx a, b;` |
//! | Measurements | `measure q -> c;`, `c = measure q;` |
//! | Barriers | `barrier q;`, `barrier;` |
//!
//! Gate definitions, classical control flow and `reset` are rejected: they
//! have no meaning for a single state-evolution run.
//!
//! # Example
//!
//! ```rust
//! use qrun_qasm::parse;
//!
//! let circuit = parse(r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0], q[1];
//!     measure q -> c;
//! "#).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_gates(), 2);
//! ```

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::{MAX_QUBITS, parse};
