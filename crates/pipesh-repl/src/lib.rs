//! pipesh REPL: interactive shell for concurrent filter pipelines.
//!
//! This REPL provides an interactive interface to the pipesh kernel.
//! It handles:
//! - Job control: `exit`, `kill <n>`, `repl_jobs`, `help`
//! - Foreground pipelines (wait for the last stage) and background ones (`&`)
//! - Command history via rustyline

use std::num::IntErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::runtime::Runtime;

use pipesh_kernel::scheduler::Sink;
use pipesh_kernel::{
    strip_background_suffix, JobControlError, JobId, JobMode, Kernel, KernelConfig, StageExit,
};

/// What the caller should do after a line has been processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Continue with optional output
    Continue(Option<String>),
    /// Exit the REPL (caller should save history and exit)
    Exit,
}

/// REPL configuration and state.
pub struct Repl {
    kernel: Kernel,
    runtime: Runtime,
}

impl Repl {
    /// Create a new REPL rooted at the current directory, writing to stdout.
    pub fn new() -> Result<Self> {
        Self::with_config(KernelConfig::repl().from_env())
    }

    /// Create a new REPL with a custom kernel configuration.
    pub fn with_config(config: KernelConfig) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        Ok(Self {
            kernel: Kernel::new(config),
            runtime,
        })
    }

    /// Create a REPL on a caller-supplied runtime and sink.
    ///
    /// With a current-thread runtime, background jobs only make progress
    /// while a foreground pipeline is being waited on.
    pub fn with_runtime(config: KernelConfig, runtime: Runtime, sink: Arc<dyn Sink>) -> Self {
        Self {
            kernel: Kernel::with_sink(config, sink),
            runtime,
        }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Process a single line of input.
    pub fn process_line(&mut self, line: &str) -> Response {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Response::Continue(None);
        }

        let mut words = trimmed.split_whitespace();
        match words.next() {
            Some("exit") if words.next().is_none() => Response::Exit,
            Some("kill") => Response::Continue(self.kill(words.next(), words.next()).err().map(|e| e.to_string())),
            Some("repl_jobs") if words.next().is_none() => Response::Continue(self.list_jobs()),
            Some("help") if words.next().is_none() => Response::Continue(Some(self.help())),
            _ => Response::Continue(self.launch(trimmed)),
        }
    }

    fn kill(&self, arg: Option<&str>, extra: Option<&str>) -> Result<(), JobControlError> {
        let id = match (arg.map(|a| (a, a.parse::<u64>())), extra) {
            (Some((_, Ok(n))), None) => JobId(n),
            (Some((raw, Err(e))), None) if *e.kind() == IntErrorKind::PosOverflow => {
                return Err(JobControlError::NoSuchJob(format!("kill {}", raw)));
            }
            _ => return Err(JobControlError::RequiresParameter("kill".to_string())),
        };
        self.kernel.interrupt(id)
    }

    /// One `"\t<id>. <command>"` line per running background job.
    fn list_jobs(&self) -> Option<String> {
        let jobs = self.kernel.list_jobs();
        if jobs.is_empty() {
            return None;
        }
        let lines: Vec<String> = jobs.iter().map(|job| format!("\t{}. {}", job.id, job.command)).collect();
        Some(lines.join("\n"))
    }

    fn launch(&self, line: &str) -> Option<String> {
        let (pipeline, mode) = strip_background_suffix(line);
        let result = match mode {
            JobMode::Background => {
                let _guard = self.runtime.enter();
                self.kernel.spawn_background_as(pipeline, line).map(|id| {
                    tracing::debug!(%id, "started background job");
                })
            }
            JobMode::Foreground => self.runtime.block_on(self.kernel.run_foreground(pipeline)).map(|exit| {
                if exit != StageExit::Completed {
                    tracing::debug!(%exit, "foreground pipeline did not complete");
                }
            }),
        };
        result.err().map(|e| e.to_string())
    }

    fn help(&self) -> String {
        let mut out = String::from(HELP_TEXT);
        for schema in self.kernel.stages().schemas() {
            out.push_str(&format!("\n  {:<18} {}", schema.usage, schema.description));
        }
        out
    }
}

const HELP_TEXT: &str = r#"pipesh: concurrent filter pipelines

Commands:
  exit              Exit the shell
  kill <n>          Interrupt background job n
  repl_jobs         List running background jobs
  help              Show this help

Pipelines:
  a | b | c         Each stage runs concurrently; lines flow left to right
  cmd &             Run in the background

Stages:"#;

const GOODBYE: &str = "Goodbye.";

/// Save REPL history to disk.
fn save_history(rl: &mut Editor<(), DefaultHistory>, history_path: &Option<PathBuf>) {
    if let Some(path) = history_path {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create history directory: {}", e);
            }
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

/// Run the REPL.
pub fn run() -> Result<()> {
    println!("pipesh v{}", env!("CARGO_PKG_VERSION"));
    println!("Type help for commands, exit to quit.");

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;

    let history_path = directories::BaseDirs::new().map(|b| b.data_dir().join("pipesh").join("history.txt"));
    if let Some(ref path) = history_path {
        if let Err(e) = rl.load_history(path) {
            // Missing history is expected on first run
            let is_not_found =
                matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound);
            if !is_not_found {
                tracing::warn!("Failed to load history: {}", e);
            }
        }
    }

    let mut repl = Repl::new()?;

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = rl.add_history_entry(line.as_str()) {
                        tracing::warn!("Failed to add history entry: {}", e);
                    }
                }

                match repl.process_line(&line) {
                    Response::Continue(Some(output)) => println!("{}", output),
                    Response::Continue(None) => {}
                    Response::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    save_history(&mut rl, &history_path);
    println!("{}", GOODBYE);

    Ok(())
}
