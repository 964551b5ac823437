//! Options passed across the simulation boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HalResult;

/// Floating-point precision of the returned amplitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexType {
    /// Two single-precision floats per amplitude.
    Complex64,
    /// Two double-precision floats per amplitude.
    #[default]
    Complex128,
}

impl fmt::Display for ComplexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexType::Complex64 => write!(f, "complex64"),
            ComplexType::Complex128 => write!(f, "complex128"),
        }
    }
}

/// Rank and world size of the process running the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributedContext {
    /// 0-based rank of this process.
    pub rank: usize,
    /// Number of processes in the run.
    pub size: usize,
}

impl DistributedContext {
    /// Context of a plain, non-distributed run.
    pub const fn single() -> Self {
        Self { rank: 0, size: 1 }
    }

    /// Whether this process reports and persists results.
    pub const fn is_reporting_rank(&self) -> bool {
        self.rank == 0
    }

    /// Whether more than one process takes part.
    pub const fn is_distributed(&self) -> bool {
        self.size > 1
    }
}

impl Default for DistributedContext {
    fn default() -> Self {
        Self::single()
    }
}

fn default_optimize() -> String {
    "evolution".into()
}

fn default_backend() -> String {
    "statevector".into()
}

const fn default_atol() -> f64 {
    1e-8
}

/// Whether `optimize` names a state-evolution strategy (`evolution`,
/// `evolution-hybrid`, ...).
pub fn is_evolution_strategy(optimize: &str) -> bool {
    optimize.starts_with("evolution")
}

/// Options for one simulation call.
///
/// Decoded from the driver's resolved configuration. Keys the engine does
/// not know are kept in `extra` so engines can pick up their own settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Per-qubit initial state (`0`, `1`, `+`, `-`); all zeros when absent.
    #[serde(default)]
    pub initial_state: Option<String>,

    /// Per-qubit final state (`0`, `1`, `+`, `-`, `.`); all open when absent.
    #[serde(default)]
    pub final_state: Option<String>,

    /// Simulation strategy.
    #[serde(default = "default_optimize")]
    pub optimize: String,

    /// Engine name.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Spread work over a thread pool.
    #[serde(default)]
    pub parallel: bool,

    /// Gate fusion level for tensor networks.
    #[serde(default)]
    pub compress: Option<i64>,

    #[serde(default)]
    pub max_iterations: Option<i64>,

    #[serde(default)]
    pub max_repeats: Option<i64>,

    #[serde(default)]
    pub max_largest_intermediate: Option<i64>,

    #[serde(default)]
    pub max_n_slices: Option<i64>,

    /// Return the tensor network instead of contracting it.
    #[serde(default)]
    pub tensor_only: bool,

    #[serde(default)]
    pub complex_type: ComplexType,

    /// Attach run statistics to the returned state.
    #[serde(default)]
    pub return_info: bool,

    /// Absolute tolerance for the norm check.
    #[serde(default = "default_atol")]
    pub atol: f64,

    /// Set by the driver, never read from configuration.
    #[serde(skip)]
    pub distributed: DistributedContext,

    /// Remaining configuration keys, forwarded untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SimulationOptions {
    /// Decode options from a configuration mapping.
    pub fn from_config(config: &serde_json::Map<String, serde_json::Value>) -> HalResult<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(
            config.clone(),
        ))?)
    }

    /// Set the initial state.
    pub fn with_initial_state(mut self, state: impl Into<String>) -> Self {
        self.initial_state = Some(state.into());
        self
    }

    /// Set the final state.
    pub fn with_final_state(mut self, state: impl Into<String>) -> Self {
        self.final_state = Some(state.into());
        self
    }

    /// Set the simulation strategy.
    pub fn with_optimize(mut self, optimize: impl Into<String>) -> Self {
        self.optimize = optimize.into();
        self
    }

    /// Enable or disable the worker pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Request the tensor network instead of a state.
    pub fn with_tensor_only(mut self, tensor_only: bool) -> Self {
        self.tensor_only = tensor_only;
        self
    }

    /// Set the gate fusion level.
    pub fn with_compress(mut self, compress: i64) -> Self {
        self.compress = Some(compress);
        self
    }

    /// Set the amplitude precision.
    pub fn with_complex_type(mut self, complex_type: ComplexType) -> Self {
        self.complex_type = complex_type;
        self
    }

    /// Attach run statistics.
    pub fn with_return_info(mut self, return_info: bool) -> Self {
        self.return_info = return_info;
        self
    }

    /// Set the distributed context.
    pub fn with_distributed(mut self, distributed: DistributedContext) -> Self {
        self.distributed = distributed;
        self
    }

    /// Whether the strategy is a state evolution.
    pub fn is_evolution(&self) -> bool {
        is_evolution_strategy(&self.optimize)
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            initial_state: None,
            final_state: None,
            optimize: default_optimize(),
            backend: default_backend(),
            parallel: false,
            compress: None,
            max_iterations: None,
            max_repeats: None,
            max_largest_intermediate: None,
            max_n_slices: None,
            tensor_only: false,
            complex_type: ComplexType::default(),
            return_info: false,
            atol: default_atol(),
            distributed: DistributedContext::single(),
            extra: serde_json::Map::new(),
        }
    }
}
