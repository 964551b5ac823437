//! qrun command-line entry point.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::CommandFactory;
use console::style;
use tracing_subscriber::EnvFilter;

use qrun_cli::args::{Cli, request_from_matches};
use qrun_cli::distributed::EnvRuntime;
use qrun_cli::pipeline;

fn main() -> anyhow::Result<()> {
    let matches = Cli::command().get_matches();
    let request = request_from_matches(&matches);

    // Setup logging
    let filter = if matches.get_flag("verbose") {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = pipeline::run(
        &request,
        &EnvRuntime::new(),
        &mut std::io::stdin(),
        &mut std::io::stdout().lock(),
    );

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
