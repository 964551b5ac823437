//! Running the simulation and recording its result.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use num_complex::Complex64;
use serde::Serialize;
use tracing::{debug, info};

use qrun_hal::{
    DistributedContext, RunInfo, SimulationOptions, SimulationOutput, Simulator, TensorNetwork,
};
use qrun_ir::Circuit;

use crate::config::{Configuration, get_flag};
use crate::error::{DriverError, DriverResult};

/// Everything needed to start the simulation.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    /// Coerced configuration with normalized states.
    pub config: Configuration,
    pub circuit: Circuit,
    pub context: DistributedContext,
}

/// Output of one simulation call and how long it took.
#[derive(Debug)]
pub struct RunRecord {
    pub output: SimulationOutput,
    /// Wall-clock seconds spent in the simulation call.
    pub runtime: f64,
}

/// Serializable form of a simulation output.
///
/// Cannot hold a worker pool; see [`prepare_for_persistence`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PersistedOutput {
    State(Vec<Complex64>),
    StateWithInfo(Vec<Complex64>, RunInfo),
    Tensor(TensorNetwork),
}

/// One line of the output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedRecord {
    pub simulate: PersistedOutput,
    #[serde(rename = "runtime (s)")]
    pub runtime: f64,
}

/// Call the simulator and time the call.
pub fn execute(simulator: &dyn Simulator, run: &PreparedRun) -> DriverResult<RunRecord> {
    let options = SimulationOptions::from_config(&run.config)?.with_distributed(run.context);
    debug!(
        "Simulating {} qubits on '{}' with optimize='{}'",
        run.circuit.num_qubits(),
        simulator.name(),
        options.optimize
    );

    let start = Instant::now();
    let output = simulator.simulate(&run.circuit, &options)?;
    let runtime = start.elapsed().as_secs_f64();

    info!("Simulation finished in {runtime:.3}s");
    Ok(RunRecord { output, runtime })
}

/// Turn an output into its serializable form.
///
/// A tensor-only parallel run hands back a worker pool; it is dropped here.
/// A pool in any other configuration is unexpected and rejected.
pub fn prepare_for_persistence(
    output: SimulationOutput,
    config: &Configuration,
) -> DriverResult<PersistedOutput> {
    match output {
        SimulationOutput::State(state) => Ok(PersistedOutput::State(state)),
        SimulationOutput::StateWithInfo { state, info } => {
            Ok(PersistedOutput::StateWithInfo(state, info))
        }
        SimulationOutput::Tensor(artifact) => {
            let (network, pool) = artifact.into_parts();
            if let Some(pool) = pool {
                if !(get_flag(config, "tensor_only") && get_flag(config, "parallel")) {
                    return Err(DriverError::Persistence(
                        "tensor output carries a worker pool, which cannot be serialized".into(),
                    ));
                }
                debug!("Dropping {pool:?} before persisting");
            }
            Ok(PersistedOutput::Tensor(network))
        }
    }
}

/// Write `record` as one JSON line, appending or truncating.
pub fn persist(record: &PersistedRecord, path: &Path, append: bool) -> DriverResult<()> {
    let line = serde_json::to_string(record)
        .map_err(|e| DriverError::Persistence(format!("cannot serialize record: {e}")))?;

    let mut options = OpenOptions::new();
    if append {
        options.append(true).create(true);
    } else {
        options.write(true).create(true).truncate(true);
    }

    let write_error =
        |e: std::io::Error| DriverError::Persistence(format!("{}: {e}", path.display()));
    let mut file = options.open(path).map_err(write_error)?;
    writeln!(file, "{line}").map_err(write_error)?;

    info!("Result written to {}", path.display());
    Ok(())
}
