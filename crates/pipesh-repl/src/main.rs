//! pipesh CLI entry point.
//!
//! Usage:
//!   pipesh                      # Interactive REPL
//!   pipesh -c <pipeline>        # Run one foreground pipeline and exit

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pipesh_kernel::{Kernel, KernelConfig, StageExit};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => {
            pipesh_repl::run()?;
            Ok(ExitCode::SUCCESS)
        }

        Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("pipesh {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some("-c") => {
            let cmd = args.get(2).context("-c requires a pipeline argument")?;
            run_command(cmd)
        }

        Some(unknown) => {
            eprintln!("Unknown option: {unknown}");
            eprintln!("Run 'pipesh --help' for usage.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_help() {
    println!(
        r#"pipesh v{}

Usage:
  pipesh                       Interactive REPL
  pipesh -c <pipeline>         Run a pipeline and exit

Options:
  -c <pipeline>                Run a pipeline in the foreground and exit
  -h, --help                   Show this help
  -V, --version                Show version

Environment:
  PIPESH_CHANNEL_CAPACITY      Items buffered between stages (default 64)
  PIPESH_CWD                   Working directory for ls, pwd and cat
  RUST_LOG                     Log filter, e.g. pipesh_kernel=debug

Examples:
  pipesh -c 'cat notes.txt | grep -i todo | wc'
  pipesh -c 'echo hello | uppercase'
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Run one pipeline in the foreground and exit.
fn run_command(cmd: &str) -> Result<ExitCode> {
    let kernel = Kernel::new(KernelConfig::named("command").from_env());
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    match rt.block_on(kernel.run_foreground(cmd)) {
        Ok(StageExit::Completed) => Ok(ExitCode::SUCCESS),
        Ok(exit) => {
            tracing::debug!(%exit, "pipeline did not complete");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
