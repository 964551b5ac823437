//! Verbose terminal output.

use std::io::{self, Write};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use num_complex::Complex64;

use crate::config::{Configuration, render};

/// Number of basis states shown after an evolution.
const PREVIEW: usize = 8;

/// Print every option and the qubit count.
pub fn print_configuration(
    out: &mut dyn Write,
    config: &Configuration,
    num_qubits: usize,
) -> io::Result<()> {
    writeln!(out, "{} Run configuration", style("→").cyan().bold())?;
    for (key, value) in config {
        writeln!(out, "  {}: {}", style(key).dim(), render(value))?;
    }
    writeln!(out, "  {}: {}", style("num_qubits").dim(), num_qubits)
}

/// Basis indices previewed for a state of `len` amplitudes, with their labels.
///
/// The label of index `x` is its binary form reversed, so the first symbol
/// belongs to the first qubit.
pub fn preview_indices(len: usize) -> Vec<(String, usize)> {
    let num_qubits = len.trailing_zeros() as usize;
    (0..len.min(PREVIEW))
        .map(|x| {
            let label = if num_qubits == 0 {
                String::new()
            } else {
                format!("{x:0num_qubits$b}")
            };
            let reversed: String = label.chars().rev().collect();
            let index = usize::from_str_radix(&reversed, 2).unwrap_or(0);
            (label, index)
        })
        .collect()
}

/// Print amplitude and probability of the first basis states.
pub fn print_amplitudes(out: &mut dyn Write, state: &[Complex64]) -> io::Result<()> {
    writeln!(out, "{} Final state", style("→").cyan().bold())?;
    for (label, index) in preview_indices(state.len()) {
        let amp = state[index];
        writeln!(
            out,
            "  |{}⟩ {:+.6}{:+.6}j  p = {:.6}",
            style(label).green(),
            amp.re,
            amp.im,
            amp.norm_sqr()
        )?;
    }
    if state.len() > PREVIEW {
        writeln!(out, "  ... ({} amplitudes)", state.len())?;
    }
    Ok(())
}

pub fn print_runtime(out: &mut dyn Write, runtime: f64) -> io::Result<()> {
    writeln!(out, "{} Runtime: {:.6} s", style("✓").green().bold(), runtime)
}

/// Spinner shown on stderr while the simulation runs.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
