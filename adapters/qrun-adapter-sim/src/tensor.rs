//! Uncontracted tensor network of a circuit.

use num_complex::Complex64;

use qrun_hal::{HalResult, TensorNetwork, TensorNode, TensorRole};
use qrun_ir::Circuit;

use crate::prepare::{check_symbols, single_qubit_state};

/// Build the network for `circuit` between `initial_state` and `final_state`.
///
/// Both states may leave qubits open with `.`. With `compress >= 1`, runs of
/// single-qubit gates on the same qubit are fused into one tensor.
pub fn build_network(
    circuit: &Circuit,
    initial_state: &str,
    final_state: &str,
    compress: i64,
) -> HalResult<TensorNetwork> {
    check_symbols(initial_state, "01+-.")?;
    check_symbols(final_state, "01+-.")?;

    let mut nodes = Vec::new();
    let mut open_inputs = Vec::new();
    let mut open_qubits = Vec::new();

    for (qubit, symbol) in (0u32..).zip(initial_state.chars()) {
        match single_qubit_state(symbol) {
            Some(vector) => nodes.push(TensorNode {
                role: TensorRole::Input,
                tag: symbol.to_string(),
                qubits: vec![qubit],
                data: vector.to_vec(),
            }),
            None => open_inputs.push(qubit),
        }
    }

    // Last node on each qubit if it is a fusable single-qubit gate.
    let mut fusable: Vec<Option<usize>> = vec![None; circuit.num_qubits()];

    for inst in circuit.instructions() {
        let Some(gate) = inst.as_gate() else {
            continue;
        };
        let qubits: Vec<u32> = inst.qubits.iter().map(|q| q.0).collect();
        let matrix = gate.matrix();

        if compress >= 1 && qubits.len() == 1 {
            let q = qubits[0] as usize;
            if let Some(prev) = fusable[q] {
                let node = &mut nodes[prev];
                node.data = matmul2(&matrix, &node.data);
                node.tag = format!("{}*{}", gate.name(), node.tag);
                continue;
            }
            fusable[q] = Some(nodes.len());
        } else {
            for &q in &qubits {
                fusable[q as usize] = None;
            }
        }

        nodes.push(TensorNode {
            role: TensorRole::Gate,
            tag: gate.name().to_string(),
            qubits,
            data: matrix,
        });
    }

    for (qubit, symbol) in (0u32..).zip(final_state.chars()) {
        match single_qubit_state(symbol) {
            Some(vector) => nodes.push(TensorNode {
                role: TensorRole::Output,
                tag: symbol.to_string(),
                qubits: vec![qubit],
                data: vector.iter().map(Complex64::conj).collect(),
            }),
            None => open_qubits.push(qubit),
        }
    }

    Ok(TensorNetwork {
        num_qubits: circuit.num_qubits(),
        nodes,
        open_inputs,
        open_qubits,
    })
}

/// Product `a * b` of two row-major 2x2 matrices.
fn matmul2(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    vec![
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
    ]
}
