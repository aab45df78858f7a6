//! The Kernel: the context object behind one pipesh session.
//!
//! The Kernel owns and coordinates the core components:
//! - Stage registry (builtins)
//! - Chain builder (channel capacity)
//! - Job table (background jobs)
//! - Sink (where terminal stages write)
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                          Kernel                            │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐  │
//! │  │ StageRegistry│  │ ChainBuilder │  │  Sink            │  │
//! │  │  (builtins)  │  │  (capacity)  │  │  (stdout, tests) │  │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘  │
//! │  ┌──────────────────────────────┐                          │
//! │  │  JobTable (background)       │                          │
//! │  └──────────────────────────────┘                          │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use pipesh_types::{JobId, JobInfo, JobMode};

use crate::error::{ChainResult, JobControlError};
use crate::parser;
use crate::scheduler::{
    Chain, ChainBuilder, Job, JobTable, Sink, StageExit, StdoutSink, DEFAULT_CHANNEL_CAPACITY,
};
use crate::stages::{register_builtins, BuildContext, StageRegistry};

/// Environment variable overriding the channel capacity.
pub const CHANNEL_CAPACITY_ENV: &str = "PIPESH_CHANNEL_CAPACITY";

/// Environment variable overriding the working directory.
pub const CWD_ENV: &str = "PIPESH_CWD";

/// Configuration for kernel initialization.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Name of this kernel (for identification).
    pub name: String,

    /// Directory that `ls`, `pwd` and relative `cat` paths resolve against.
    pub cwd: PathBuf,

    /// Capacity of each channel between stages, in items.
    pub channel_capacity: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl KernelConfig {
    /// Create a kernel config with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Create a REPL config rooted at the current working directory.
    pub fn repl() -> Self {
        Self::named("repl")
    }

    /// Apply `PIPESH_CHANNEL_CAPACITY` and `PIPESH_CWD` overrides.
    ///
    /// Unusable values are logged and ignored.
    pub fn from_env(self) -> Self {
        let mut config = self;
        if let Ok(raw) = std::env::var(CHANNEL_CAPACITY_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.channel_capacity = capacity,
                _ => tracing::warn!("ignoring {}={:?}: expected a positive integer", CHANNEL_CAPACITY_ENV, raw),
            }
        }
        if let Some(cwd) = std::env::var_os(CWD_ENV) {
            let cwd = PathBuf::from(cwd);
            if cwd.is_dir() {
                config.cwd = cwd;
            } else {
                tracing::warn!("ignoring {}={}: not a directory", CWD_ENV, cwd.display());
            }
        }
        config
    }

    /// Set the initial working directory.
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = cwd;
        self
    }

    /// Set the channel capacity. Zero is raised to one.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

/// Outcome of [`Kernel::launch`].
#[derive(Debug)]
pub enum Launched {
    /// Running; the caller waits on it.
    Foreground(Job),
    /// Running and registered under this id.
    Background(JobId),
}

/// Split a trailing `" &"` off a command line.
pub fn strip_background_suffix(line: &str) -> (&str, JobMode) {
    let line = line.trim();
    match line.strip_suffix(" &") {
        Some(pipeline) => (pipeline.trim_end(), JobMode::Background),
        None => (line, JobMode::Foreground),
    }
}

/// The Kernel: builds and runs pipelines.
pub struct Kernel {
    /// Kernel name.
    name: String,
    /// Working directory for stage construction.
    cwd: PathBuf,
    /// Stage registry.
    stages: Arc<StageRegistry>,
    /// Background jobs.
    jobs: Arc<JobTable>,
    /// Where terminal stages write.
    sink: Arc<dyn Sink>,
    builder: ChainBuilder,
}

impl Kernel {
    /// Create a kernel that writes pipeline output to stdout.
    pub fn new(config: KernelConfig) -> Self {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    /// Create a kernel with a custom sink.
    pub fn with_sink(config: KernelConfig, sink: Arc<dyn Sink>) -> Self {
        let mut stages = StageRegistry::new();
        register_builtins(&mut stages);

        let KernelConfig { name, cwd, channel_capacity } = config;
        Self {
            name,
            cwd,
            stages: Arc::new(stages),
            jobs: Arc::new(JobTable::new()),
            sink,
            builder: ChainBuilder::new(channel_capacity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cwd(&self) -> &std::path::Path {
        &self.cwd
    }

    pub fn stages(&self) -> Arc<StageRegistry> {
        self.stages.clone()
    }

    pub fn jobs(&self) -> Arc<JobTable> {
        self.jobs.clone()
    }

    /// Parse a pipeline and link its stages. Nothing runs yet.
    pub fn compile(&self, pipeline: &str) -> ChainResult<Chain> {
        let specs = parser::parse(pipeline)?;
        let ctx = BuildContext::new(&self.cwd);
        let bodies = specs
            .iter()
            .map(|spec| Ok((spec.display(), self.stages.build(spec, &ctx)?)))
            .collect::<ChainResult<Vec<_>>>()?;
        self.builder.build(bodies, self.sink.clone())
    }

    /// Compile and start a pipeline.
    ///
    /// A background job is registered with its command text plus `" &"`. A
    /// construction error starts and registers nothing. Must be called from
    /// within a tokio runtime.
    pub fn launch(&self, pipeline: &str, mode: JobMode) -> ChainResult<Launched> {
        match mode {
            JobMode::Foreground => self.start(pipeline, pipeline, mode).map(Launched::Foreground),
            JobMode::Background => self.spawn_background(pipeline).map(Launched::Background),
        }
    }

    /// Run a pipeline and wait for its terminal stage.
    pub async fn run_foreground(&self, pipeline: &str) -> ChainResult<StageExit> {
        let job = self.start(pipeline, pipeline, JobMode::Foreground)?;
        Ok(job.wait().await)
    }

    /// Start a pipeline in the background and register it.
    pub fn spawn_background(&self, pipeline: &str) -> ChainResult<JobId> {
        self.spawn_background_as(pipeline, &format!("{} &", pipeline))
    }

    /// Like [`Kernel::spawn_background`], but registers `command` verbatim.
    ///
    /// The REPL passes the line as typed so job listings keep its spacing.
    pub fn spawn_background_as(&self, pipeline: &str, command: &str) -> ChainResult<JobId> {
        let job = self.start(pipeline, command, JobMode::Background)?;
        Ok(self.jobs.register(job))
    }

    #[tracing::instrument(level = "debug", skip(self, command))]
    fn start(&self, pipeline: &str, command: &str, mode: JobMode) -> ChainResult<Job> {
        let chain = self.compile(pipeline).inspect_err(|e| tracing::debug!("construction failed: {}", e))?;
        Ok(Job::launch(chain, command, mode))
    }

    /// Cancel a background job's workers.
    pub fn interrupt(&self, id: JobId) -> Result<(), JobControlError> {
        self.jobs.interrupt(id)
    }

    /// Background jobs that are still running.
    pub fn list_jobs(&self) -> Vec<JobInfo> {
        self.jobs.list_alive()
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("name", &self.name)
            .field("cwd", &self.cwd)
            .field("capacity", &self.builder.capacity())
            .field("jobs", &self.jobs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use crate::scheduler::CollectSink;

    fn kernel() -> (Kernel, CollectSink) {
        let sink = CollectSink::new();
        let kernel = Kernel::with_sink(KernelConfig::named("test"), Arc::new(sink.clone()));
        (kernel, sink)
    }

    #[test]
    fn test_strip_background_suffix() {
        assert_eq!(strip_background_suffix("echo x &"), ("echo x", JobMode::Background));
        assert_eq!(strip_background_suffix("  echo x  "), ("echo x", JobMode::Foreground));
        assert_eq!(strip_background_suffix("echo x&"), ("echo x&", JobMode::Foreground));
        assert_eq!(strip_background_suffix("echo  x   &  "), ("echo  x", JobMode::Background));
    }

    #[test]
    fn test_config_builders() {
        let config = KernelConfig::repl()
            .with_channel_capacity(0)
            .with_cwd(PathBuf::from("/tmp"))
            .with_name("custom");
        assert_eq!(config.channel_capacity, 1);
        assert_eq!(config.cwd, PathBuf::from("/tmp"));
        assert_eq!(config.name, "custom");
    }

    #[tokio::test]
    async fn test_foreground_echo() {
        let (kernel, sink) = kernel();
        let exit = kernel.run_foreground("echo hello world | uppercase").await.unwrap();
        assert_eq!(exit, StageExit::Completed);
        assert_eq!(sink.lines(), vec!["HELLO WORLD"]);
    }

    #[tokio::test]
    async fn test_construction_error_registers_nothing() {
        let (kernel, sink) = kernel();
        let err = kernel.spawn_background("echo x | nope").unwrap_err();
        assert_eq!(err, ChainError::CommandNotFound("nope".into()));
        assert!(kernel.jobs().is_empty());
        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn test_launch_modes() {
        let (kernel, sink) = kernel();
        let Launched::Foreground(job) = kernel.launch("echo fg", JobMode::Foreground).unwrap() else {
            panic!("expected a foreground job");
        };
        assert_eq!(job.command(), "echo fg");
        assert_eq!(job.wait().await, StageExit::Completed);
        assert_eq!(sink.lines(), vec!["fg"]);
        assert!(kernel.jobs().is_empty());

        let Launched::Background(id) = kernel.launch("sleep 10", JobMode::Background).unwrap() else {
            panic!("expected a background job");
        };
        assert_eq!(id, JobId(1));
        kernel.interrupt(id).unwrap();
    }

    #[tokio::test]
    async fn test_background_command_recorded_as_typed() {
        let (kernel, _sink) = kernel();
        let line = "sleep 10    &";
        let (pipeline, mode) = strip_background_suffix(line);
        assert_eq!(mode, JobMode::Background);

        let id = kernel.spawn_background_as(pipeline, line).unwrap();
        assert_eq!(kernel.list_jobs()[0].command, "sleep 10    &");
        kernel.interrupt(id).unwrap();
    }

    #[tokio::test]
    async fn test_background_command_keeps_suffix() {
        let (kernel, _sink) = kernel();
        let id = kernel.spawn_background("sleep 10").unwrap();
        let info = kernel.jobs().get(id).unwrap();
        assert_eq!(info.command, "sleep 10 &");
        kernel.interrupt(id).unwrap();
    }
}
