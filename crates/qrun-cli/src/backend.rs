//! Engine selection by name.

use qrun_adapter_sim::StatevectorSimulator;
use qrun_hal::Simulator;

use crate::error::{DriverError, DriverResult};

/// Names accepted by `--backend`.
pub const AVAILABLE: &[&str] = &["statevector", "sim", "numpy", "cpu"];

/// Build the simulator named by `backend`.
pub fn select(backend: &str) -> DriverResult<Box<dyn Simulator>> {
    match backend.to_lowercase().as_str() {
        "statevector" | "sim" | "numpy" | "cpu" => Ok(Box::new(StatevectorSimulator::new())),
        other => Err(DriverError::Configuration(format!(
            "Unknown backend: '{other}'. Available: {}",
            AVAILABLE.join(", ")
        ))),
    }
}
