//! What a simulation call returns.

use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::HalResult;

/// Statistics about a finished state evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    /// Circuit width.
    pub num_qubits: usize,
    /// Number of unitary gates applied.
    pub num_gates: usize,
    /// Circuit depth.
    pub depth: usize,
    /// Strategy that produced the state.
    pub optimize: String,
    /// Engine that produced the state.
    pub backend: String,
    /// Norm of the full state after evolution.
    pub norm: f64,
    /// Threads used for amplitude updates.
    pub threads: usize,
}

/// Role of a node in a tensor network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorRole {
    /// Single-qubit input state.
    Input,
    /// Gate tensor.
    Gate,
    /// Single-qubit projection of the final state.
    Output,
}

/// One tensor of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorNode {
    pub role: TensorRole,
    /// Gate name or state symbol.
    pub tag: String,
    /// Qubits the tensor acts on, in leg order.
    pub qubits: Vec<u32>,
    /// Row-major tensor entries.
    pub data: Vec<Complex64>,
}

/// A tensor network that has not been contracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorNetwork {
    pub num_qubits: usize,
    pub nodes: Vec<TensorNode>,
    /// Qubits without an input state tensor.
    pub open_inputs: Vec<u32>,
    /// Qubits whose output leg stays open.
    pub open_qubits: Vec<u32>,
}

/// Thread pool handed back with a tensor network for later contraction.
///
/// Cheap to clone; it cannot be serialized.
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<rayon::ThreadPool>,
}

impl WorkerPool {
    /// Build a pool with `threads` workers; 0 uses rayon's default.
    pub fn new(threads: usize) -> HalResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self {
            inner: Arc::new(pool),
        })
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.inner.current_num_threads()
    }

    /// Run `op` inside the pool.
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.inner.install(op)
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.num_threads())
            .finish()
    }
}

/// Tensor network plus the pool meant to contract it.
#[derive(Debug, Clone)]
pub struct TensorArtifact {
    pub network: TensorNetwork,
    pub pool: Option<WorkerPool>,
}

impl TensorArtifact {
    /// Split into the serializable network and the pool handle.
    pub fn into_parts(self) -> (TensorNetwork, Option<WorkerPool>) {
        (self.network, self.pool)
    }
}

/// Result of a simulation call.
#[derive(Debug, Clone)]
pub enum SimulationOutput {
    /// Final state over the open qubits.
    State(Vec<Complex64>),
    /// Final state with run statistics.
    StateWithInfo { state: Vec<Complex64>, info: RunInfo },
    /// Uncontracted network.
    Tensor(TensorArtifact),
}

impl SimulationOutput {
    /// The state vector, if this output carries one.
    pub fn state(&self) -> Option<&[Complex64]> {
        match self {
            SimulationOutput::State(state) | SimulationOutput::StateWithInfo { state, .. } => {
                Some(state)
            }
            SimulationOutput::Tensor(_) => None,
        }
    }
}
