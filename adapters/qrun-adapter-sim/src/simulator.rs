//! Simulator implementation.

use std::time::Instant;

use num_complex::Complex64;
use tracing::{debug, instrument};

use qrun_hal::{
    ComplexType, HalError, HalResult, RunInfo, SimulationOptions, SimulationOutput, Simulator,
    TensorArtifact, WorkerPool,
};
use qrun_ir::Circuit;

use crate::prepare::prepare_state;
use crate::statevector::Statevector;
use crate::tensor::build_network;

/// Fusion level used when the run does not set `compress`.
const DEFAULT_COMPRESS: i64 = 4;

/// Local statevector engine.
///
/// Holds the full `2^n` state in memory, so circuits are capped at
/// `max_qubits` (30 by default).
pub struct StatevectorSimulator {
    max_qubits: usize,
    /// Worker threads for parallel runs; 0 lets rayon decide.
    threads: usize,
}

impl StatevectorSimulator {
    /// Create a new simulator with default settings.
    pub fn new() -> Self {
        Self {
            max_qubits: 30,
            threads: 0,
        }
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: usize) -> Self {
        Self {
            max_qubits,
            ..Self::new()
        }
    }

    /// Fix the size of the worker pool used for parallel runs.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Resolve a state string, filling in `fill` for every qubit when absent.
    fn resolve_state(state: Option<&str>, fill: char, num_qubits: usize) -> HalResult<String> {
        let state = state.map_or_else(|| fill.to_string().repeat(num_qubits), str::to_string);
        let len = state.chars().count();
        if len != num_qubits {
            return Err(HalError::InvalidState(format!(
                "'{state}' has {len} symbols but the circuit has {num_qubits} qubits"
            )));
        }
        Ok(state)
    }

    #[instrument(skip(self, circuit, pool))]
    fn evolve(
        &self,
        circuit: &Circuit,
        initial_state: &str,
        final_state: &str,
        atol: f64,
        pool: Option<&WorkerPool>,
    ) -> HalResult<(Vec<Complex64>, f64)> {
        let start = Instant::now();

        let mut sv = Statevector::from_amplitudes(prepare_state(initial_state)?, circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst, pool);
        }

        let norm = sv.norm();
        let deviation = (norm - 1.0).abs();
        if deviation > atol {
            return Err(HalError::Normalization { deviation, atol });
        }

        let state = sv.project(final_state)?;
        debug!(
            "Evolved {} qubits through {} instructions in {:?}",
            sv.num_qubits(),
            circuit.instructions().len(),
            start.elapsed()
        );
        Ok((state, norm))
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator for StatevectorSimulator {
    fn name(&self) -> &str {
        "statevector"
    }

    fn max_qubits(&self) -> Option<usize> {
        Some(self.max_qubits)
    }

    #[instrument(skip(self, circuit, options), fields(qubits = circuit.num_qubits()))]
    fn simulate(
        &self,
        circuit: &Circuit,
        options: &SimulationOptions,
    ) -> HalResult<SimulationOutput> {
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {num_qubits} qubits but the statevector engine only supports {}",
                self.max_qubits
            )));
        }

        let initial_state =
            Self::resolve_state(options.initial_state.as_deref(), '0', num_qubits)?;
        let final_state = Self::resolve_state(options.final_state.as_deref(), '.', num_qubits)?;

        let pool = if options.parallel {
            Some(WorkerPool::new(self.threads)?)
        } else {
            None
        };

        if options.tensor_only {
            let compress = options.compress.unwrap_or(DEFAULT_COMPRESS);
            let network = build_network(circuit, &initial_state, &final_state, compress)?;
            debug!("Built tensor network with {} nodes", network.nodes.len());
            return Ok(SimulationOutput::Tensor(TensorArtifact { network, pool }));
        }

        if !options.is_evolution() {
            return Err(HalError::Unsupported(format!(
                "optimize='{}' needs tensor contraction; use an 'evolution' strategy or tensor_only",
                options.optimize
            )));
        }
        if initial_state.contains('.') {
            return Err(HalError::InvalidState(
                "open qubits ('.') in the initial state need tensor contraction".into(),
            ));
        }

        let (mut state, norm) = self.evolve(
            circuit,
            &initial_state,
            &final_state,
            options.atol,
            pool.as_ref(),
        )?;

        if options.complex_type == ComplexType::Complex64 {
            for amp in &mut state {
                *amp = Complex64::new(f64::from(amp.re as f32), f64::from(amp.im as f32));
            }
        }

        if options.return_info {
            let info = RunInfo {
                num_qubits,
                num_gates: circuit.num_gates(),
                depth: circuit.depth(),
                optimize: options.optimize.clone(),
                backend: self.name().to_string(),
                norm,
                threads: pool.as_ref().map_or(1, WorkerPool::num_threads),
            };
            return Ok(SimulationOutput::StateWithInfo { state, info });
        }

        Ok(SimulationOutput::State(state))
    }
}
