//! qrun Circuit Representation
//!
//! A flat, ordered circuit model: a fixed number of qubits and a list of
//! instructions applied in program order. This is all the simulation driver
//! and the engines need; there is no DAG and no symbolic parameters, since
//! angles are resolved to numbers when the circuit text is parsed.
//!
//! # Example
//!
//! ```rust
//! use qrun_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_gates(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Matrix convention
//!
//! [`StandardGate::matrix`] returns a row-major `2^k × 2^k` matrix where the
//! first qubit an instruction lists is the most significant bit of the row
//! and column index. `cx q[0], q[1]` therefore has its control on the high
//! bit.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::QubitId;
