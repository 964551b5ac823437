//! Merging command-line, parameter-source and positional options.
//!
//! Precedence, highest first:
//!
//! 1. positional `CIRCUIT_FILENAME` / `OUTPUT_FILENAME`
//! 2. flags given explicitly on the command line or through the environment
//! 3. the `--params` source
//! 4. built-in flag defaults, filled in only for keys still absent

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::Configuration;
use crate::error::{DriverError, DriverResult};

/// Normalize a key from a parameter source (`max-iterations` -> `max_iterations`).
pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}

/// Load the `--params` source.
///
/// An existing path is read as a JSON object; anything else is parsed as an
/// inline JSON object.
pub fn load_params(source: &str) -> DriverResult<Configuration> {
    let path = Path::new(source);
    let text = if path.is_file() {
        debug!("Reading parameters from {}", path.display());
        fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?
    } else {
        source.to_string()
    };

    let value: Value = serde_json::from_str(&text).map_err(|e| {
        DriverError::Configuration(format!(
            "--params must be a JSON object or a path to one: {e}"
        ))
    })?;

    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .map(|(key, value)| (normalize_key(&key), value))
            .collect()),
        other => Err(DriverError::Configuration(format!(
            "--params must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Merge the three option layers. Never invents values.
pub fn merge(cli: &Configuration, file: &Configuration, positional: &Configuration) -> Configuration {
    let mut merged = Configuration::new();
    for layer in [file, cli, positional] {
        for (key, value) in layer {
            if !value.is_null() {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    strip_auto_compress(&mut merged);
    merged
}

/// Fill in `defaults` for keys the merge left absent.
pub fn apply_defaults(config: &mut Configuration, defaults: &Configuration) {
    for (key, value) in defaults {
        if !config.contains_key(key) && !value.is_null() {
            config.insert(key.clone(), value.clone());
        }
    }
    strip_auto_compress(config);
}

/// `compress = "auto"` leaves the choice to the engine.
fn strip_auto_compress(config: &mut Configuration) {
    let is_auto = config
        .get("compress")
        .and_then(Value::as_str)
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("auto"));
    if is_auto {
        config.remove("compress");
    }
}
