//! The simulator trait.

use qrun_ir::Circuit;

use crate::error::HalResult;
use crate::options::SimulationOptions;
use crate::output::SimulationOutput;

/// A simulation engine.
///
/// One call runs one circuit to completion. Implementations are synchronous
/// and may use their own worker pool when `options.parallel` is set.
pub trait Simulator: Send + Sync {
    /// Engine name used in diagnostics.
    fn name(&self) -> &str;

    /// Widest circuit the engine accepts, if it has a limit.
    fn max_qubits(&self) -> Option<usize> {
        None
    }

    /// Simulate `circuit` under `options`.
    fn simulate(&self, circuit: &Circuit, options: &SimulationOptions)
    -> HalResult<SimulationOutput>;
}
