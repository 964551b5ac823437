//! qrun Local Statevector Engine
//!
//! Exact state evolution of a circuit between a product initial state and a
//! (partially) projected final state. Memory grows as `2^n`, which puts the
//! practical limit around 30 qubits.
//!
//! # Features
//!
//! - **Product-state boundaries**: `0`, `1`, `+`, `-` per qubit; `.` keeps a
//!   final qubit open.
//! - **Parallel updates**: amplitude updates split over a rayon pool when
//!   `parallel` is set.
//! - **Tensor-only runs**: returns the uncontracted network, optionally with
//!   fused single-qubit gates.
//!
//! # Memory
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//! | 30 | ~16 GB |
//!
//! # Example
//!
//! ```rust
//! use qrun_adapter_sim::StatevectorSimulator;
//! use qrun_hal::{SimulationOptions, Simulator};
//! use qrun_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let options = SimulationOptions::default().with_final_state("0.");
//! let out = StatevectorSimulator::new().simulate(&circuit, &options).unwrap();
//!
//! // <0|_0 (|00> + |11>)/sqrt2 leaves |0>/sqrt2 on qubit 1
//! assert_eq!(out.state().unwrap().len(), 2);
//! ```

mod prepare;
mod simulator;
mod statevector;
mod tensor;

pub use prepare::prepare_state;
pub use simulator::StatevectorSimulator;
