//! Product states from per-qubit symbols.

use std::collections::BTreeSet;
use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use qrun_hal::{HalError, HalResult};

/// Amplitudes of the single-qubit state named by `symbol`.
///
/// `.` (an open leg) has no vector and yields `None`, as does any unknown
/// symbol.
pub fn single_qubit_state(symbol: char) -> Option<[Complex64; 2]> {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    match symbol {
        '0' => Some([one, zero]),
        '1' => Some([zero, one]),
        '+' => Some([h, h]),
        '-' => Some([h, -h]),
        _ => None,
    }
}

/// Reject any symbol outside `allowed`, listing the offenders.
pub fn check_symbols(state: &str, allowed: &str) -> HalResult<()> {
    let bad: BTreeSet<char> = state.chars().filter(|c| !allowed.contains(*c)).collect();
    if bad.is_empty() {
        Ok(())
    } else {
        let listed: Vec<String> = bad.iter().map(|c| format!("'{c}'")).collect();
        Err(HalError::InvalidState(format!(
            "Symbols {{{}}} are not allowed in '{state}'",
            listed.join(", ")
        )))
    }
}

/// Tensor product of the per-qubit states in `state`.
///
/// Character `k` describes qubit `k`. Qubit 0 is the most significant bit
/// of the amplitude index, so `"10"` is basis state 2.
pub fn prepare_state(state: &str) -> HalResult<Vec<Complex64>> {
    check_symbols(state, "01+-")?;

    let factors: Vec<[Complex64; 2]> = state.chars().filter_map(single_qubit_state).collect();
    let n = factors.len();

    Ok((0..1usize << n)
        .map(|index| {
            factors
                .iter()
                .enumerate()
                .fold(Complex64::new(1.0, 0.0), |acc, (k, factor)| {
                    acc * factor[(index >> (n - 1 - k)) & 1]
                })
        })
        .collect())
}
