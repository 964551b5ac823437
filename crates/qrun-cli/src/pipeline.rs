//! The run pipeline, from raw option layers to a written record.

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info};

use qrun_hal::{HalError, is_evolution_strategy};
use qrun_ir::Circuit;

use crate::backend;
use crate::coerce::coerce_all;
use crate::config::{Configuration, STDIN, get_flag, get_str};
use crate::distributed::{self, DistributedRuntime};
use crate::error::{DriverError, DriverResult};
use crate::executor::{self, PersistedRecord, PreparedRun};
use crate::merge::{apply_defaults, load_params, merge};
use crate::output::check_output;
use crate::report;
use crate::state::normalize;

/// Raw option layers collected at the command-line boundary.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Options given explicitly on the command line or through the environment.
    pub cli: Configuration,
    /// Built-in flag defaults.
    pub defaults: Configuration,
    /// Positional circuit/output filenames.
    pub positional: Configuration,
    /// `--params` path or inline JSON.
    pub params: Option<String>,
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub num_qubits: usize,
    pub runtime: f64,
    /// Where the record went; `None` on non-reporting ranks.
    pub written_to: Option<PathBuf>,
}

/// Merge, default and coerce the option layers.
pub fn resolve_configuration(request: &RunRequest) -> DriverResult<Configuration> {
    let file = match &request.params {
        Some(source) => load_params(source)?,
        None => Configuration::new(),
    };
    let mut config = merge(&request.cli, &file, &request.positional);
    apply_defaults(&mut config, &request.defaults);
    coerce_all(config)
}

/// Read and parse the circuit from a file or from `stdin`.
pub fn load_circuit(circuit_filename: &str, stdin: &mut dyn Read) -> DriverResult<Circuit> {
    let source = if circuit_filename == STDIN {
        let mut source = String::new();
        stdin
            .read_to_string(&mut source)
            .map_err(|e| DriverError::io(STDIN, e))?;
        source
    } else {
        fs::read_to_string(circuit_filename).map_err(|e| DriverError::io(circuit_filename, e))?
    };

    let circuit = qrun_qasm::parse(&source)?;
    info!(
        "Loaded circuit from {circuit_filename}: {} qubits, {} gates",
        circuit.num_qubits(),
        circuit.num_gates()
    );
    Ok(circuit)
}

/// Expand `initial_state` / `final_state` to one symbol per qubit.
fn normalize_states(config: &mut Configuration, num_qubits: usize) -> DriverResult<()> {
    for key in ["initial_state", "final_state"] {
        if let Some(state) = get_str(config, key) {
            let normalized = normalize(state, num_qubits)?;
            debug!("{key} = {normalized}");
            config.insert(key.to_string(), Value::String(normalized));
        }
    }
    Ok(())
}

/// Run one simulation end to end.
///
/// Verbose output goes to `stdout`, and only on the reporting rank.
pub fn run(
    request: &RunRequest,
    runtime: &dyn DistributedRuntime,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> DriverResult<RunSummary> {
    let mut config = resolve_configuration(request)?;

    let circuit_filename = get_str(&config, "circuit_filename")
        .unwrap_or(STDIN)
        .to_string();
    let use_mpi = get_flag(&config, "use_mpi");
    distributed::guard_stdin(use_mpi, &circuit_filename)?;
    let context = distributed::establish(use_mpi, runtime)?;
    let reporting = context.is_reporting_rank();

    let output_path = get_str(&config, "output_filename")
        .map(PathBuf::from)
        .ok_or_else(|| DriverError::Configuration("no output_filename given".into()))?;
    let append = get_flag(&config, "append");
    if reporting {
        check_output(&output_path, append)?;
    }

    let circuit = load_circuit(&circuit_filename, stdin)?;
    let num_qubits = circuit.num_qubits();
    let simulator = backend::select(get_str(&config, "backend").unwrap_or("statevector"))?;
    if let Some(max) = simulator.max_qubits().filter(|&max| num_qubits > max) {
        return Err(HalError::CircuitTooLarge(format!(
            "Circuit has {num_qubits} qubits but '{}' supports at most {max}",
            simulator.name()
        ))
        .into());
    }
    normalize_states(&mut config, num_qubits)?;

    let verbose = reporting && get_flag(&config, "verbose");
    let print_error = |e| DriverError::io("stdout", e);
    if verbose {
        report::print_configuration(stdout, &config, num_qubits).map_err(print_error)?;
    }

    let evolution = get_str(&config, "optimize").is_none_or(is_evolution_strategy);
    let prepared = PreparedRun {
        config,
        circuit,
        context,
    };

    let spinner = verbose.then(|| report::spinner("Simulating..."));
    let record = executor::execute(simulator.as_ref(), &prepared);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let record = record?;

    if verbose {
        if evolution {
            if let Some(state) = record.output.state() {
                report::print_amplitudes(stdout, state).map_err(print_error)?;
            }
        }
        report::print_runtime(stdout, record.runtime).map_err(print_error)?;
    }

    if !reporting {
        debug!("Rank {} does not persist results", context.rank);
        return Ok(RunSummary {
            num_qubits,
            runtime: record.runtime,
            written_to: None,
        });
    }

    let simulate = executor::prepare_for_persistence(record.output, &prepared.config)?;
    let persisted = PersistedRecord {
        simulate,
        runtime: record.runtime,
    };
    executor::persist(&persisted, &output_path, append)?;

    Ok(RunSummary {
        num_qubits,
        runtime: persisted.runtime,
        written_to: Some(output_path),
    })
}
