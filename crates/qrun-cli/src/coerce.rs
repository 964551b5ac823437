//! Typed coercion of string-valued options.

use serde_json::Value;
use tracing::debug;

use crate::config::{Configuration, render};
use crate::error::{DriverError, DriverResult};
use crate::expr::evaluate;

/// Options holding integers.
pub const INTEGER_KEYS: &[&str] = &[
    "compress",
    "max_iterations",
    "max_repeats",
    "max_largest_intermediate",
    "max_n_slices",
];

/// Options holding floats.
pub const FLOAT_KEYS: &[&str] = &["atol"];

/// Options holding booleans.
pub const BOOLEAN_KEYS: &[&str] = &[
    "parallel",
    "tensor_only",
    "return_info",
    "use_mpi",
    "append",
    "verbose",
];

/// Type a coerced option ends up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Integer,
    Float,
    Boolean,
}

/// Evaluate each present key of `keys` and cast it to `target`.
///
/// Returns only the coerced entries; absent keys are skipped.
pub fn coerce(config: &Configuration, keys: &[&str], target: Target) -> DriverResult<Configuration> {
    let mut coerced = Configuration::new();

    for &key in keys {
        let Some(raw) = config.get(key) else {
            continue;
        };
        let text = render(raw);
        let fail = |reason: String| DriverError::Expression {
            key: key.to_string(),
            value: text.clone(),
            reason,
        };

        let value = evaluate(&text).map_err(fail)?;
        let typed = match target {
            Target::Integer => Value::from(value.to_int().map_err(fail)?),
            Target::Float => {
                let f = value.to_float();
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| fail(format!("{f} is not a finite number")))?
            }
            Target::Boolean => Value::Bool(value.to_bool()),
        };
        debug!("Coerced {key}: '{text}' -> {typed}");
        coerced.insert(key.to_string(), typed);
    }

    Ok(coerced)
}

/// Run the integer, float and boolean passes and merge the results back.
pub fn coerce_all(mut config: Configuration) -> DriverResult<Configuration> {
    let passes = [
        (INTEGER_KEYS, Target::Integer),
        (FLOAT_KEYS, Target::Float),
        (BOOLEAN_KEYS, Target::Boolean),
    ];
    for (keys, target) in passes {
        let coerced = coerce(&config, keys, target)?;
        config.extend(coerced);
    }
    Ok(config)
}
