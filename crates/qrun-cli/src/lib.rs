//! Driver for a single quantum-circuit simulation run.
//!
//! `qrun` turns one circuit file into one JSON-lines record:
//!
//! ```text
//! clap / env ─┐
//! --params ───┼─ merge ─ defaults ─ coerce ─ distributed context ─ output check
//! positional ─┘                                        │
//!                    circuit ─ state normalization ─ simulate ─ persist
//! ```
//!
//! Option values arrive as strings and are evaluated as small arithmetic
//! expressions (`2**10`, `1e-8`, `True`) before being typed. The engine sits
//! behind [`qrun_hal::Simulator`]; [`backend::select`] picks one by name.
//!
//! ```no_run
//! use qrun_cli::distributed::EnvRuntime;
//! use qrun_cli::pipeline::{RunRequest, run};
//! use serde_json::json;
//!
//! let mut request = RunRequest::default();
//! request.cli.insert("circuit_filename".into(), json!("bell.qasm"));
//! request.cli.insert("output_filename".into(), json!("bell.jsonl"));
//! let summary = run(
//!     &request,
//!     &EnvRuntime::new(),
//!     &mut std::io::stdin(),
//!     &mut std::io::stdout(),
//! )?;
//! println!("{} qubits in {:.3}s", summary.num_qubits, summary.runtime);
//! # Ok::<(), qrun_cli::DriverError>(())
//! ```

pub mod args;
pub mod backend;
pub mod coerce;
pub mod config;
pub mod distributed;
pub mod error;
pub mod executor;
pub mod expr;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod state;

pub use args::Cli;
pub use config::Configuration;
pub use error::{DriverError, DriverResult};
pub use pipeline::{RunRequest, RunSummary, run};
