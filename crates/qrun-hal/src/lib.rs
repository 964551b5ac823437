//! qrun simulation boundary
//!
//! The driver hands a [`qrun_ir::Circuit`] and a set of
//! [`SimulationOptions`] to a [`Simulator`] and gets a
//! [`SimulationOutput`] back. Engines live in their own adapter crates.
//!
//! # Outputs
//!
//! | Variant | When |
//! |---------|------|
//! | `State` | state evolution |
//! | `StateWithInfo` | state evolution with `return_info` |
//! | `Tensor` | `tensor_only`; may carry a [`WorkerPool`] |
//!
//! A [`WorkerPool`] is a live thread pool and has no serialized form;
//! callers persisting an output must take it out first.
//!
//! # Implementing a Simulator
//!
//! ```rust
//! use num_complex::Complex64;
//! use qrun_hal::{HalResult, SimulationOptions, SimulationOutput, Simulator};
//! use qrun_ir::Circuit;
//!
//! struct Vacuum;
//!
//! impl Simulator for Vacuum {
//!     fn name(&self) -> &str {
//!         "vacuum"
//!     }
//!
//!     fn simulate(
//!         &self,
//!         circuit: &Circuit,
//!         _options: &SimulationOptions,
//!     ) -> HalResult<SimulationOutput> {
//!         let mut state = vec![Complex64::new(0.0, 0.0); 1 << circuit.num_qubits()];
//!         state[0] = Complex64::new(1.0, 0.0);
//!         Ok(SimulationOutput::State(state))
//!     }
//! }
//!
//! let out = Vacuum
//!     .simulate(&Circuit::with_size("empty", 2), &SimulationOptions::default())
//!     .unwrap();
//! assert_eq!(out.state().unwrap().len(), 4);
//! ```

mod error;
mod options;
mod output;
mod simulator;

pub use error::{HalError, HalResult};
pub use options::{ComplexType, DistributedContext, SimulationOptions, is_evolution_strategy};
pub use output::{
    RunInfo, SimulationOutput, TensorArtifact, TensorNetwork, TensorNode, TensorRole, WorkerPool,
};
pub use simulator::Simulator;
