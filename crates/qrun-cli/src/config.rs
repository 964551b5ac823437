//! The resolved run configuration.

use serde_json::Value;

/// Snake-case option name to JSON value. Absent keys are unset; no value
/// is ever `null`.
pub type Configuration = serde_json::Map<String, Value>;

/// Circuit filename that means "read standard input".
pub const STDIN: &str = "stdin";

/// Every option the driver knows about.
pub const KNOWN_KEYS: &[&str] = &[
    "circuit_filename",
    "output_filename",
    "initial_state",
    "final_state",
    "optimize",
    "backend",
    "parallel",
    "compress",
    "max_iterations",
    "max_repeats",
    "max_largest_intermediate",
    "max_n_slices",
    "tensor_only",
    "complex_type",
    "return_info",
    "use_mpi",
    "atol",
    "append",
    "verbose",
];

/// String value of `key`, if present and a string.
pub fn get_str<'a>(config: &'a Configuration, key: &str) -> Option<&'a str> {
    config.get(key).and_then(Value::as_str)
}

/// Boolean value of `key`; absent or non-boolean reads as `false`.
pub fn get_flag(config: &Configuration, key: &str) -> bool {
    config.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Text form of a value as it would be typed on a command line.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".into(),
        Value::Bool(false) => "False".into(),
        other => other.to_string(),
    }
}
