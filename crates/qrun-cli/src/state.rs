//! Initial and final state strings.

use crate::error::{DriverError, DriverResult};

/// Symbols a state string may repeat across every qubit.
const SYMBOLS: &str = "01+-.";

/// Expand a one-symbol state to `num_qubits` symbols and check the length.
///
/// `"+"` on three qubits becomes `"+++"`. Any other string must already
/// have one symbol per qubit.
pub fn normalize(state: &str, num_qubits: usize) -> DriverResult<String> {
    let mut chars = state.chars();
    if let (Some(symbol), None) = (chars.next(), chars.next()) {
        if SYMBOLS.contains(symbol) {
            return Ok(symbol.to_string().repeat(num_qubits));
        }
    }

    let len = state.chars().count();
    if len == num_qubits {
        Ok(state.to_string())
    } else {
        Err(DriverError::Validation(format!(
            "'{state}' has {len} symbols, expected {num_qubits}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compact_form_expands() {
        assert_eq!(normalize("0", 3).unwrap(), "000");
        assert_eq!(normalize(".", 2).unwrap(), "..");
        assert_eq!(normalize("-", 1).unwrap(), "-");
    }

    #[test]
    fn test_full_form_passes_through() {
        assert_eq!(normalize("01+", 3).unwrap(), "01+");
        assert_eq!(normalize("0.1.", 4).unwrap(), "0.1.");
    }

    #[test]
    fn test_length_mismatch() {
        let err = normalize("01", 3).unwrap_err();
        assert!(matches!(err, DriverError::Validation(_)));
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_empty_state_rejected() {
        assert!(normalize("", 2).is_err());
    }

    #[test]
    fn test_unknown_single_symbol_is_not_expanded() {
        assert!(normalize("x", 2).is_err());
    }

    proptest! {
        #[test]
        fn prop_symbol_repeats(symbol in "[01+\\-.]", n in 1usize..64) {
            let out = normalize(&symbol, n).unwrap();
            prop_assert_eq!(out.len(), n);
            prop_assert!(out.chars().all(|c| c.to_string() == symbol));
        }

        #[test]
        fn prop_wrong_length_fails(state in "[01+\\-.]{2,10}", n in 1usize..12) {
            prop_assume!(state.len() != n);
            prop_assert!(normalize(&state, n).is_err());
        }
    }
}
