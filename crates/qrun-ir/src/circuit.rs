//! High-level circuit builder API.

use rustc_hash::FxHashSet;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::QubitId;

/// A quantum circuit over a fixed number of qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Name of the circuit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of gate instructions (measurements and barriers excluded).
    pub fn num_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter(|inst| matches!(inst.kind, InstructionKind::Gate(_)))
            .count()
    }

    /// Circuit depth, counting gates and measurements.
    ///
    /// Barriers align the qubits they span but add no layer.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits()];
        for inst in &self.instructions {
            let level = inst
                .qubits
                .iter()
                .map(|q| layer[q.index()])
                .max()
                .unwrap_or(0);
            let next = match inst.kind {
                InstructionKind::Barrier => level,
                _ => level + 1,
            };
            for q in &inst.qubits {
                layer[q.index()] = next;
            }
        }
        layer.into_iter().max().unwrap_or(0)
    }

    /// Append an instruction after validating its operands.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = Some(instruction.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
            if gate.parameters().iter().any(|p| !p.is_finite()) {
                return Err(IrError::NonFiniteParameter {
                    gate_name: gate.name().to_string(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name,
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    /// Apply a standard gate to the given qubits.
    pub fn apply(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    /// Measure a qubit.
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit))
    }

    /// Insert a barrier across the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Convenience builders
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Z, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::S, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::T, [qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Sdg, [qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Tdg, [qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::SX, [qubit])
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::P(lambda), [qubit])
    }

    /// Apply generic single-qubit U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::U(theta, phi, lambda), [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Rx(theta), [qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Ry(theta), [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Rz(theta), [qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CX, [control, target])
    }

    /// Apply controlled-Y gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CY, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CZ, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::Swap, [a, b])
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CP(lambda), [control, target])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CRz(theta), [control, target])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(StandardGate::CCX, [c1, c2, target])
    }
}
