//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

/// Standard gates with known semantics.
///
/// Rotation angles are plain radians; the parser resolves symbolic
/// expressions before the gate is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),
    /// ZZ rotation gate.
    RZZ(f64),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// Get the angles of this gate, in declaration order.
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RZZ(p) => vec![p],
            StandardGate::U(a, b, c) => vec![a, b, c],
            _ => vec![],
        }
    }

    /// Build a gate from its lowercase name and resolved angles.
    ///
    /// Returns `None` for unknown names or the wrong number of angles.
    pub fn from_name(name: &str, params: &[f64]) -> Option<Self> {
        let gate = match (name, params) {
            ("id" | "i", []) => StandardGate::I,
            ("x", []) => StandardGate::X,
            ("y", []) => StandardGate::Y,
            ("z", []) => StandardGate::Z,
            ("h", []) => StandardGate::H,
            ("s", []) => StandardGate::S,
            ("sdg", []) => StandardGate::Sdg,
            ("t", []) => StandardGate::T,
            ("tdg", []) => StandardGate::Tdg,
            ("sx", []) => StandardGate::SX,
            ("sxdg", []) => StandardGate::SXdg,
            ("rx", [t]) => StandardGate::Rx(*t),
            ("ry", [t]) => StandardGate::Ry(*t),
            ("rz", [t]) => StandardGate::Rz(*t),
            ("p" | "u1" | "phase", [t]) => StandardGate::P(*t),
            ("u2", [p, l]) => StandardGate::U(std::f64::consts::FRAC_PI_2, *p, *l),
            ("u" | "u3", [t, p, l]) => StandardGate::U(*t, *p, *l),
            ("cx" | "cnot", []) => StandardGate::CX,
            ("cy", []) => StandardGate::CY,
            ("cz", []) => StandardGate::CZ,
            ("ch", []) => StandardGate::CH,
            ("swap", []) => StandardGate::Swap,
            ("iswap", []) => StandardGate::ISwap,
            ("crz", [t]) => StandardGate::CRz(*t),
            ("cp" | "cu1" | "cphase", [t]) => StandardGate::CP(*t),
            ("rzz", [t]) => StandardGate::RZZ(*t),
            ("ccx" | "toffoli", []) => StandardGate::CCX,
            ("cswap" | "fredkin", []) => StandardGate::CSwap,
            _ => return None,
        };
        Some(gate)
    }

    /// Number of angles a gate name expects, if the name is known.
    pub fn expected_parameters(name: &str) -> Option<usize> {
        match name {
            "id" | "i" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg"
            | "cx" | "cnot" | "cy" | "cz" | "ch" | "swap" | "iswap" | "ccx" | "toffoli"
            | "cswap" | "fredkin" => Some(0),
            "rx" | "ry" | "rz" | "p" | "u1" | "phase" | "crz" | "cp" | "cu1" | "cphase"
            | "rzz" => Some(1),
            "u2" => Some(2),
            "u" | "u3" => Some(3),
            _ => None,
        }
    }

    /// Row-major unitary of this gate.
    ///
    /// The first qubit of the instruction is the most significant bit of the
    /// row/column index.
    pub fn matrix(&self) -> Vec<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);

        match *self {
            StandardGate::I => vec![one, zero, zero, one],
            StandardGate::X => vec![zero, one, one, zero],
            StandardGate::Y => vec![zero, -i, i, zero],
            StandardGate::Z => vec![one, zero, zero, -one],
            StandardGate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                vec![h, h, h, -h]
            }
            StandardGate::S => diagonal(&[one, i]),
            StandardGate::Sdg => diagonal(&[one, -i]),
            StandardGate::T => diagonal(&[one, Complex64::from_polar(1.0, FRAC_PI_4)]),
            StandardGate::Tdg => diagonal(&[one, Complex64::from_polar(1.0, -FRAC_PI_4)]),
            StandardGate::SX => {
                let a = Complex64::new(0.5, 0.5);
                let b = Complex64::new(0.5, -0.5);
                vec![a, b, b, a]
            }
            StandardGate::SXdg => {
                let a = Complex64::new(0.5, -0.5);
                let b = Complex64::new(0.5, 0.5);
                vec![a, b, b, a]
            }
            StandardGate::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                vec![c, s, s, c]
            }
            StandardGate::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                vec![c, -s, s, c]
            }
            StandardGate::Rz(theta) => diagonal(&[
                Complex64::from_polar(1.0, -theta / 2.0),
                Complex64::from_polar(1.0, theta / 2.0),
            ]),
            StandardGate::P(theta) => diagonal(&[one, Complex64::from_polar(1.0, theta)]),
            StandardGate::U(theta, phi, lambda) => {
                let c = (theta / 2.0).cos();
                let s = (theta / 2.0).sin();
                vec![
                    Complex64::new(c, 0.0),
                    -Complex64::from_polar(s, lambda),
                    Complex64::from_polar(s, phi),
                    Complex64::from_polar(c, phi + lambda),
                ]
            }
            StandardGate::CX => controlled(&StandardGate::X.matrix()),
            StandardGate::CY => controlled(&StandardGate::Y.matrix()),
            StandardGate::CZ => diagonal(&[one, one, one, -one]),
            StandardGate::CH => controlled(&StandardGate::H.matrix()),
            StandardGate::Swap => permutation(4, &[(1, 2)]),
            StandardGate::ISwap => {
                let mut m = vec![zero; 16];
                m[0] = one;
                m[4 + 2] = i;
                m[2 * 4 + 1] = i;
                m[15] = one;
                m
            }
            StandardGate::CRz(theta) => controlled(&StandardGate::Rz(theta).matrix()),
            StandardGate::CP(theta) => diagonal(&[one, one, one, Complex64::from_polar(1.0, theta)]),
            StandardGate::RZZ(theta) => {
                let a = Complex64::from_polar(1.0, -theta / 2.0);
                let b = Complex64::from_polar(1.0, theta / 2.0);
                diagonal(&[a, b, b, a])
            }
            StandardGate::CCX => permutation(8, &[(6, 7)]),
            StandardGate::CSwap => permutation(8, &[(5, 6)]),
        }
    }
}

fn diagonal(entries: &[Complex64]) -> Vec<Complex64> {
    let dim = entries.len();
    let mut m = vec![Complex64::new(0.0, 0.0); dim * dim];
    for (k, value) in entries.iter().enumerate() {
        m[k * dim + k] = *value;
    }
    m
}

/// Identity on the control-off block, `target` on the control-on block.
fn controlled(target: &[Complex64]) -> Vec<Complex64> {
    let mut m = diagonal(&[Complex64::new(1.0, 0.0); 4]);
    for r in 0..2 {
        for c in 0..2 {
            m[(r + 2) * 4 + (c + 2)] = target[r * 2 + c];
        }
    }
    m
}

fn permutation(dim: usize, swaps: &[(usize, usize)]) -> Vec<Complex64> {
    let mut order: Vec<usize> = (0..dim).collect();
    for &(a, b) in swaps {
        order.swap(a, b);
    }
    let mut m = vec![Complex64::new(0.0, 0.0); dim * dim];
    for (row, col) in order.into_iter().enumerate() {
        m[row * dim + col] = Complex64::new(1.0, 0.0);
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_unitary(m: &[Complex64]) -> bool {
        let dim = (m.len() as f64).sqrt() as usize;
        for r in 0..dim {
            for c in 0..dim {
                let mut acc = Complex64::new(0.0, 0.0);
                for k in 0..dim {
                    acc += m[r * dim + k] * m[c * dim + k].conj();
                }
                let expected = if r == c { 1.0 } else { 0.0 };
                if (acc - Complex64::new(expected, 0.0)).norm() > 1e-12 {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_all_matrices_unitary() {
        let gates = [
            StandardGate::I,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::SX,
            StandardGate::SXdg,
            StandardGate::Rx(0.3),
            StandardGate::Ry(1.1),
            StandardGate::Rz(-0.7),
            StandardGate::P(0.2),
            StandardGate::U(0.1, 0.2, 0.3),
            StandardGate::CX,
            StandardGate::CY,
            StandardGate::CZ,
            StandardGate::CH,
            StandardGate::Swap,
            StandardGate::ISwap,
            StandardGate::CRz(0.4),
            StandardGate::CP(0.5),
            StandardGate::RZZ(0.6),
            StandardGate::CCX,
            StandardGate::CSwap,
        ];
        for gate in gates {
            let m = gate.matrix();
            let dim = 1usize << gate.num_qubits();
            assert_eq!(m.len(), dim * dim, "{}", gate.name());
            assert!(is_unitary(&m), "{} is not unitary", gate.name());
        }
    }

    #[test]
    fn test_cx_control_is_high_bit() {
        let m = StandardGate::CX.matrix();
        // |10> -> |11>
        assert_eq!(m[3 * 4 + 2], Complex64::new(1.0, 0.0));
        assert_eq!(m[4 + 1], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_from_name_checks_arity() {
        assert_eq!(StandardGate::from_name("rx", &[0.5]), Some(StandardGate::Rx(0.5)));
        assert_eq!(StandardGate::from_name("rx", &[]), None);
        assert_eq!(StandardGate::from_name("frobnicate", &[]), None);
        assert_eq!(StandardGate::expected_parameters("u3"), Some(3));
    }

    #[test]
    fn test_sx_squared_is_x() {
        let sx = StandardGate::SX.matrix();
        let mut sq = vec![Complex64::new(0.0, 0.0); 4];
        for r in 0..2 {
            for c in 0..2 {
                for k in 0..2 {
                    sq[r * 2 + c] += sx[r * 2 + k] * sx[k * 2 + c];
                }
            }
        }
        let x = StandardGate::X.matrix();
        for (a, b) in sq.iter().zip(&x) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    proptest! {
        #[test]
        fn prop_rotations_unitary(theta in -10.0f64..10.0, phi in -10.0f64..10.0, lambda in -10.0f64..10.0) {
            for gate in [
                StandardGate::Rx(theta),
                StandardGate::Ry(theta),
                StandardGate::Rz(theta),
                StandardGate::P(theta),
                StandardGate::U(theta, phi, lambda),
                StandardGate::CRz(theta),
                StandardGate::RZZ(theta),
            ] {
                prop_assert!(is_unitary(&gate.matrix()));
            }
        }
    }
}
