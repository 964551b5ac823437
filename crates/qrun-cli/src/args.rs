//! Command-line arguments.
//!
//! Options are collected as strings; typing happens later, after the
//! parameter source has been merged in.

use clap::parser::ValueSource;
use clap::{ArgMatches, Parser};
use serde_json::Value;

use crate::config::Configuration;
use crate::pipeline::RunRequest;

/// qrun - run a single quantum circuit simulation
#[derive(Parser, Debug)]
#[command(name = "qrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Circuit file (OpenQASM); overrides --circuit-filename
    #[arg(value_name = "CIRCUIT_FILENAME")]
    pub circuit: Option<String>,

    /// Output file (JSON lines); overrides --output-filename
    #[arg(value_name = "OUTPUT_FILENAME")]
    pub output: Option<String>,

    /// Circuit file, or `stdin`
    #[arg(short, long, env = "QRUN_CIRCUIT", default_value = "stdin")]
    pub circuit_filename: String,

    /// Output file
    #[arg(short, long, env = "QRUN_OUTPUT", default_value = "output.jsonl")]
    pub output_filename: String,

    /// Initial state, one symbol of `01+-` per qubit or a single symbol for all
    #[arg(short, long, default_value = "0")]
    pub initial_state: String,

    /// Final state, one symbol of `01+-.` per qubit or a single symbol for all
    #[arg(short, long, default_value = ".")]
    pub final_state: String,

    /// Optimization mode
    #[arg(short = 'O', long, default_value = "evolution")]
    pub optimize: String,

    /// Simulation engine (statevector, sim, numpy, cpu)
    #[arg(short, long, env = "QRUN_BACKEND", default_value = "statevector")]
    pub backend: String,

    /// Use a worker pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Gate fusion level, or `auto`
    #[arg(short = 'z', long, default_value = "auto")]
    pub compress: String,

    #[arg(long, value_name = "EXPR")]
    pub max_iterations: Option<String>,

    #[arg(long, value_name = "EXPR")]
    pub max_repeats: Option<String>,

    #[arg(long, value_name = "EXPR")]
    pub max_largest_intermediate: Option<String>,

    #[arg(long, value_name = "EXPR")]
    pub max_n_slices: Option<String>,

    /// Return the tensor network instead of a state
    #[arg(short = 'T', long)]
    pub tensor_only: bool,

    /// Amplitude precision (complex64, complex128)
    #[arg(long, default_value = "complex64")]
    pub complex_type: String,

    /// Attach run information to the result
    #[arg(short, long)]
    pub return_info: bool,

    /// Run under a process manager (mpirun, srun)
    #[arg(long, env = "QRUN_USE_MPI")]
    pub use_mpi: bool,

    /// Normalization tolerance
    #[arg(long, value_name = "EXPR", default_value = "1e-8")]
    pub atol: String,

    /// Append to the output file instead of overwriting it
    #[arg(short, long)]
    pub append: bool,

    /// Print configuration, amplitudes and runtime
    #[arg(short, long)]
    pub verbose: bool,

    /// Parameters as a JSON file or inline JSON object
    #[arg(long, env = "QRUN_PARAMS", value_name = "PATH|JSON")]
    pub params: Option<String>,
}

/// Options taking a value, by argument id.
pub const STRING_OPTIONS: &[&str] = &[
    "circuit_filename",
    "output_filename",
    "initial_state",
    "final_state",
    "optimize",
    "backend",
    "compress",
    "max_iterations",
    "max_repeats",
    "max_largest_intermediate",
    "max_n_slices",
    "complex_type",
    "atol",
];

/// Boolean flags, by argument id.
pub const FLAG_OPTIONS: &[&str] = &[
    "parallel",
    "tensor_only",
    "return_info",
    "use_mpi",
    "append",
    "verbose",
];

fn is_explicit(source: Option<ValueSource>) -> bool {
    matches!(
        source,
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

/// Split parsed arguments into the layers of a [`RunRequest`].
///
/// Values given on the command line or through the environment form the
/// explicit layer; clap defaults are kept apart so a parameter source can
/// still override them.
pub fn request_from_matches(matches: &ArgMatches) -> RunRequest {
    let mut request = RunRequest::default();

    let mut place = |id: &str, value: Value| {
        if is_explicit(matches.value_source(id)) {
            request.cli.insert(id.to_string(), value);
        } else {
            request.defaults.insert(id.to_string(), value);
        }
    };
    for &id in STRING_OPTIONS {
        if let Some(value) = matches.get_one::<String>(id) {
            place(id, Value::String(value.clone()));
        }
    }
    for &id in FLAG_OPTIONS {
        place(id, Value::Bool(matches.get_flag(id)));
    }

    let mut positional = Configuration::new();
    for (id, key) in [("circuit", "circuit_filename"), ("output", "output_filename")] {
        if let Some(value) = matches.get_one::<String>(id) {
            positional.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    request.positional = positional;
    request.params = matches.get_one::<String>("params").cloned();
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    fn request(args: &[&str]) -> RunRequest {
        let matches = Cli::command().try_get_matches_from(args).unwrap();
        request_from_matches(&matches)
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_kept_apart() {
        let req = request(&["qrun"]);
        assert!(req.cli.get("atol").is_none());
        assert_eq!(req.defaults.get("atol"), Some(&json!("1e-8")));
        assert_eq!(req.defaults.get("compress"), Some(&json!("auto")));
        assert_eq!(req.defaults.get("verbose"), Some(&json!(false)));
        assert!(req.defaults.get("max_repeats").is_none());
        assert!(req.positional.is_empty());
        assert!(req.params.is_none());
    }

    #[test]
    fn test_explicit_values() {
        let req = request(&["qrun", "-i", "+", "--atol", "1e-6", "-pv", "--max-repeats", "2**4"]);
        assert_eq!(req.cli.get("initial_state"), Some(&json!("+")));
        assert_eq!(req.cli.get("atol"), Some(&json!("1e-6")));
        assert_eq!(req.cli.get("parallel"), Some(&json!(true)));
        assert_eq!(req.cli.get("verbose"), Some(&json!(true)));
        assert_eq!(req.cli.get("max_repeats"), Some(&json!("2**4")));
        assert!(req.defaults.get("atol").is_none());
        assert_eq!(req.defaults.get("append"), Some(&json!(false)));
    }

    #[test]
    fn test_positionals() {
        let req = request(&["qrun", "circuit.qasm", "out.jsonl", "-c", "other.qasm"]);
        assert_eq!(req.positional.get("circuit_filename"), Some(&json!("circuit.qasm")));
        assert_eq!(req.positional.get("output_filename"), Some(&json!("out.jsonl")));
        assert_eq!(req.cli.get("circuit_filename"), Some(&json!("other.qasm")));
    }

    #[test]
    fn test_params_flag() {
        let req = request(&["qrun", "--params", r#"{"atol": 0.1}"#]);
        assert_eq!(req.params.as_deref(), Some(r#"{"atol": 0.1}"#));
    }
}
