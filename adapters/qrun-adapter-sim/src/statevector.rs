//! Statevector evolution engine.

use num_complex::Complex64;
use rayon::prelude::*;

use qrun_hal::{HalResult, WorkerPool};
use qrun_ir::{Instruction, InstructionKind};

use crate::prepare::{check_symbols, single_qubit_state};

/// A dense statevector of `2^n` amplitudes.
///
/// Qubit 0 is the most significant bit of the amplitude index.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    #[cfg(test)]
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap prepared amplitudes; `amplitudes.len()` must be `2^num_qubits`.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>, num_qubits: usize) -> Self {
        debug_assert_eq!(amplitudes.len(), 1 << num_qubits);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Index bit holding `qubit`.
    fn bit(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    /// Euclidean norm of the state.
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt()
    }

    /// Apply an instruction, splitting the update over `pool` if given.
    pub fn apply(&mut self, instruction: &Instruction, pool: Option<&WorkerPool>) {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
                self.apply_matrix(&gate.matrix(), &qubits, pool);
            }
            // no effect on a state evolution
            InstructionKind::Measure | InstructionKind::Barrier => {}
        }
    }

    /// Apply a `2^k x 2^k` row-major matrix to `qubits`.
    ///
    /// The first listed qubit is the most significant bit of the matrix
    /// row/column index.
    fn apply_matrix(&mut self, matrix: &[Complex64], qubits: &[usize], pool: Option<&WorkerPool>) {
        let k = qubits.len();
        let dim = 1usize << k;
        debug_assert_eq!(matrix.len(), dim * dim);

        // Bit of the amplitude index for each matrix index bit, MSB first.
        let masks: Vec<usize> = qubits.iter().map(|&q| self.bit(q)).collect();
        let target_mask: usize = masks.iter().sum();

        let row_of = |index: usize| -> usize {
            masks
                .iter()
                .fold(0, |row, &m| (row << 1) | usize::from(index & m != 0))
        };
        let with_column = |base: usize, col: usize| -> usize {
            masks.iter().enumerate().fold(base, |idx, (j, &m)| {
                if (col >> (k - 1 - j)) & 1 == 1 {
                    idx | m
                } else {
                    idx
                }
            })
        };

        let input = &self.amplitudes;
        let update = |(index, out): (usize, &mut Complex64)| {
            let row = row_of(index);
            let base = index & !target_mask;
            *out = (0..dim)
                .map(|col| matrix[row * dim + col] * input[with_column(base, col)])
                .sum();
        };

        let mut output = vec![Complex64::new(0.0, 0.0); input.len()];
        match pool {
            Some(pool) => pool.install(|| output.par_iter_mut().enumerate().for_each(update)),
            None => output.iter_mut().enumerate().for_each(update),
        }
        self.amplitudes = output;
    }

    /// Contract every qubit of `final_state` that names a state and keep
    /// the `.` qubits open.
    ///
    /// Returns `2^open` amplitudes, indexed like a state of the open qubits
    /// alone: the lowest open qubit is the most significant bit.
    pub fn project(&self, final_state: &str) -> HalResult<Vec<Complex64>> {
        check_symbols(final_state, "01+-.")?;

        let mut open = Vec::new();
        let mut closed = Vec::new();
        for (qubit, symbol) in final_state.chars().enumerate() {
            match single_qubit_state(symbol) {
                Some(vector) => closed.push((qubit, [vector[0].conj(), vector[1].conj()])),
                None => open.push(qubit),
            }
        }

        let mut projected = vec![Complex64::new(0.0, 0.0); 1 << open.len()];
        for (index, amp) in self.amplitudes.iter().enumerate() {
            let is_set = |q: usize| usize::from(index & self.bit(q) != 0);
            let weight = closed
                .iter()
                .fold(Complex64::new(1.0, 0.0), |w, (q, bra)| w * bra[is_set(*q)]);
            let target = open.iter().fold(0, |t, &q| (t << 1) | is_set(q));
            projected[target] += weight * amp;
        }
        Ok(projected)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }
}
