//! End-to-end tests of the driver: argument parsing, option layering, and
//! complete runs against the statevector engine.

use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use serde_json::{Value, json};

use qrun_cli::args::{Cli, request_from_matches};
use qrun_cli::distributed::DistributedRuntime;
use qrun_cli::pipeline::{RunRequest, resolve_configuration, run};
use qrun_cli::{DriverError, DriverResult};
use qrun_hal::HalError;

const BELL: &str = r#"OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
creg c[2];
h q[0];
cx q[0], q[1];
measure q -> c;
"#;

struct SingleProcess;

impl DistributedRuntime for SingleProcess {
    fn world(&self) -> DriverResult<Option<(usize, usize)>> {
        Ok(None)
    }
}

struct Rank(usize, usize);

impl DistributedRuntime for Rank {
    fn world(&self) -> DriverResult<Option<(usize, usize)>> {
        Ok(Some((self.0, self.1)))
    }
}

fn request(args: &[&str]) -> RunRequest {
    let matches = Cli::command().try_get_matches_from(args).unwrap();
    request_from_matches(&matches)
}

fn records(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn amplitude(value: &Value) -> (f64, f64) {
    (value[0].as_f64().unwrap(), value[1].as_f64().unwrap())
}

// ============================================================================
// Option layering
// ============================================================================

#[test]
fn test_explicit_flag_beats_params_file() {
    let dir = tempfile::tempdir().unwrap();
    let params = dir.path().join("params.json");
    fs::write(&params, r#"{"atol": "1e-3", "max-repeats": "3", "backend": "cpu"}"#).unwrap();

    let req = request(&[
        "qrun",
        "--atol",
        "1e-5",
        "--params",
        params.to_str().unwrap(),
    ]);
    let config = resolve_configuration(&req).unwrap();

    assert_eq!(config["atol"].as_f64(), Some(1e-5));
    assert_eq!(config["max_repeats"], json!(3));
    assert_eq!(config["backend"], json!("cpu"));
}

#[test]
fn test_params_file_beats_defaults() {
    let req = request(&["qrun", "--params", r#"{"atol": "1e-3", "verbose": "True"}"#]);
    let config = resolve_configuration(&req).unwrap();
    assert_eq!(config["atol"].as_f64(), Some(1e-3));
    assert_eq!(config["verbose"], json!(true));
    assert_eq!(config["initial_state"], json!("0"));
}

#[test]
fn test_auto_compress_is_absent() {
    let config = resolve_configuration(&request(&["qrun"])).unwrap();
    assert!(!config.contains_key("compress"));

    let config = resolve_configuration(&request(&["qrun", "-z", "2*2"])).unwrap();
    assert_eq!(config["compress"], json!(4));
}

#[test]
fn test_positional_beats_flag() {
    let req = request(&["qrun", "a.qasm", "-c", "b.qasm"]);
    let config = resolve_configuration(&req).unwrap();
    assert_eq!(config["circuit_filename"], json!("a.qasm"));
}

#[test]
fn test_bad_expression_reported() {
    let err = resolve_configuration(&request(&["qrun", "--max-iterations", "ten"])).unwrap_err();
    assert!(matches!(err, DriverError::Expression { ref key, .. } if key == "max_iterations"));
}

#[test]
fn test_unknown_flag_rejected() {
    assert!(Cli::command().try_get_matches_from(["qrun", "--shots", "10"]).is_err());
}

// ============================================================================
// Full runs
// ============================================================================

#[test]
fn test_single_qubit_run() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("x.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, "OPENQASM 2.0;\nqreg q[1];\nx q[0];\n").unwrap();

    let req = request(&["qrun", circuit.to_str().unwrap(), output.to_str().unwrap()]);
    let summary = run(&req, &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap();
    assert_eq!(summary.num_qubits, 1);
    assert_eq!(summary.written_to.as_deref(), Some(output.as_path()));

    let lines = records(&output);
    assert_eq!(lines.len(), 1);
    let state = lines[0]["simulate"].as_array().unwrap();
    assert_eq!(state.len(), 2);
    let (re, im) = amplitude(&state[1]);
    assert!((re - 1.0).abs() < 1e-6 && im.abs() < 1e-6);
    assert!(lines[0]["runtime (s)"].as_f64().unwrap() >= 0.0);
}

#[test]
fn test_bell_state_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("bell.jsonl");

    let req = request(&["qrun", "-o", output.to_str().unwrap()]);
    let mut stdin = BELL.as_bytes();
    run(&req, &SingleProcess, &mut stdin, &mut io::sink()).unwrap();

    let lines = records(&output);
    let state = lines[0]["simulate"].as_array().unwrap();
    assert_eq!(state.len(), 4);
    let half = std::f64::consts::FRAC_1_SQRT_2;
    assert!((amplitude(&state[0]).0 - half).abs() < 1e-6);
    assert!(amplitude(&state[1]).0.abs() < 1e-6);
    assert!(amplitude(&state[2]).0.abs() < 1e-6);
    assert!((amplitude(&state[3]).0 - half).abs() < 1e-6);
}

#[test]
fn test_projected_final_state() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, BELL).unwrap();

    // first qubit projected on |1>, second left open
    let req = request(&[
        "qrun",
        "-c",
        circuit.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "-f",
        "1.",
    ]);
    run(&req, &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap();

    let state = records(&output)[0]["simulate"].clone();
    let state = state.as_array().unwrap();
    assert_eq!(state.len(), 2);
    assert!(amplitude(&state[0]).0.abs() < 1e-6);
    assert!((amplitude(&state[1]).0 - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
}

#[test]
fn test_first_qubit_is_most_significant() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");

    let req = request(&["qrun", "-o", output.to_str().unwrap()]);
    let mut stdin = "OPENQASM 2.0; qreg q[2]; x q[0];".as_bytes();
    run(&req, &SingleProcess, &mut stdin, &mut io::sink()).unwrap();

    let state = records(&output)[0]["simulate"].clone();
    let ones: Vec<usize> = state
        .as_array()
        .unwrap()
        .iter()
        .enumerate()
        .filter(|(_, amp)| amplitude(amp).0 > 0.5)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(ones, vec![2]);
}

#[test]
fn test_append_accumulates_records() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("h.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, "OPENQASM 2.0;\nqreg q[1];\nh q[0];\n").unwrap();

    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap(), "-a"];
    run(&request(&args), &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap();
    run(&request(&args), &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap();
    assert_eq!(records(&output).len(), 2);

    // without --append the file is overwritten
    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap()];
    run(&request(&args), &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap();
    assert_eq!(records(&output).len(), 1);
}

#[test]
fn test_return_info_record() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("h.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, "OPENQASM 2.0;\nqreg q[2];\nh q;\n").unwrap();

    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap(), "-r"];
    run(&request(&args), &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap();

    let record = &records(&output)[0]["simulate"];
    assert_eq!(record[0].as_array().unwrap().len(), 4);
    assert_eq!(record[1]["num_qubits"], json!(2));
    assert_eq!(record[1]["num_gates"], json!(2));
}

#[test]
fn test_tensor_only_parallel_run() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("tn.jsonl");
    fs::write(&circuit, BELL).unwrap();

    let args = [
        "qrun",
        circuit.to_str().unwrap(),
        output.to_str().unwrap(),
        "-T",
        "-p",
    ];
    run(&request(&args), &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap();

    let record = &records(&output)[0]["simulate"];
    assert_eq!(record["num_qubits"], json!(2));
    assert!(!record["nodes"].as_array().unwrap().is_empty());
    assert_eq!(record["open_qubits"], json!([0, 1]));
}

// ============================================================================
// Verbose output
// ============================================================================

#[test]
fn test_verbose_report() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, BELL).unwrap();

    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap(), "-v"];
    let req = request(&args);
    let config = resolve_configuration(&req).unwrap();

    let mut stdout = Vec::new();
    run(&req, &SingleProcess, &mut io::empty(), &mut stdout).unwrap();
    let text = console::strip_ansi_codes(&String::from_utf8(stdout).unwrap()).into_owned();

    for key in config.keys() {
        assert!(text.contains(&format!("  {key}: ")), "missing {key} in\n{text}");
    }
    assert!(text.contains("  initial_state: 00\n"));
    assert!(text.contains("  num_qubits: 2\n"));
    assert!(text.contains("|00⟩ +0.707107+0.000000j  p = 0.500000"), "{text}");
    assert!(text.contains("Runtime: "));
}

#[test]
fn test_quiet_without_verbose() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, BELL).unwrap();

    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap()];
    let mut stdout = Vec::new();
    run(&request(&args), &SingleProcess, &mut io::empty(), &mut stdout).unwrap();
    assert!(stdout.is_empty());
}

#[test]
fn test_verbose_only_on_reporting_rank() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, BELL).unwrap();

    let args = [
        "qrun",
        circuit.to_str().unwrap(),
        output.to_str().unwrap(),
        "--use-mpi",
        "-v",
    ];
    let mut stdout = Vec::new();
    run(&request(&args), &Rank(1, 2), &mut io::empty(), &mut stdout).unwrap();
    assert!(stdout.is_empty());

    run(&request(&args), &Rank(0, 2), &mut io::empty(), &mut stdout).unwrap();
    assert!(!stdout.is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_circuit_wider_than_engine() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");

    let args = ["qrun", "-o", output.to_str().unwrap(), "-i", "0"];
    let mut stdin = "OPENQASM 2.0; qreg q[40]; h q;".as_bytes();
    let err = run(&request(&args), &SingleProcess, &mut stdin, &mut io::sink()).unwrap_err();
    assert!(matches!(err, DriverError::Simulation(HalError::CircuitTooLarge(_))));
}

#[test]
fn test_huge_register_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");

    let args = ["qrun", "-o", output.to_str().unwrap()];
    let mut stdin = "OPENQASM 2.0; qreg q[2000000000]; h q;".as_bytes();
    let err = run(&request(&args), &SingleProcess, &mut stdin, &mut io::sink()).unwrap_err();
    assert!(matches!(err, DriverError::Parse(_)));
}

#[test]
fn test_wrong_state_length() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, BELL).unwrap();

    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap(), "-i", "010"];
    let err = run(&request(&args), &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap_err();
    assert!(matches!(err, DriverError::Validation(_)));
}

#[test]
fn test_unknown_backend() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, BELL).unwrap();

    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap(), "-b", "qpu"];
    let err = run(&request(&args), &SingleProcess, &mut io::empty(), &mut io::sink()).unwrap_err();
    assert!(matches!(err, DriverError::Configuration(_)));
}

#[test]
fn test_stdin_rejected_with_mpi() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");

    let args = ["qrun", "-o", output.to_str().unwrap(), "--use-mpi"];
    let err = run(&request(&args), &SingleProcess, &mut BELL.as_bytes(), &mut io::sink()).unwrap_err();
    assert!(matches!(err, DriverError::Configuration(_)));
    assert!(!output.exists());
}

#[test]
fn test_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("out.jsonl");

    let args = ["qrun", "-o", output.to_str().unwrap()];
    let err = run(&request(&args), &SingleProcess, &mut BELL.as_bytes(), &mut io::sink()).unwrap_err();
    assert!(matches!(err, DriverError::Io { .. }));
}

#[test]
fn test_parse_error_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.jsonl");

    let args = ["qrun", "-o", output.to_str().unwrap()];
    let mut stdin = "OPENQASM 2.0; qreg q[1]; frobnicate q[0];".as_bytes();
    let err = run(&request(&args), &SingleProcess, &mut stdin, &mut io::sink()).unwrap_err();
    assert!(matches!(err, DriverError::Parse(_)));
}

#[test]
fn test_non_reporting_rank_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let circuit = dir.path().join("bell.qasm");
    let output = dir.path().join("out.jsonl");
    fs::write(&circuit, BELL).unwrap();

    let args = ["qrun", circuit.to_str().unwrap(), output.to_str().unwrap(), "--use-mpi"];
    let summary = run(&request(&args), &Rank(1, 2), &mut io::empty(), &mut io::sink()).unwrap();
    assert!(summary.written_to.is_none());
    assert!(!output.exists());

    let summary = run(&request(&args), &Rank(0, 2), &mut io::empty(), &mut io::sink()).unwrap();
    assert_eq!(summary.written_to.as_deref(), Some(output.as_path()));
}
