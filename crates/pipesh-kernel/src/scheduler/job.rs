//! Launched pipelines.
//!
//! A [`Job`] owns one worker per stage. Liveness comes from the workers'
//! exited status only; channel occupancy says nothing about whether a stage
//! is about to resume.

use pipesh_types::JobMode;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::chain::Chain;
use super::stage::StageExit;

/// One running stage.
pub struct Worker {
    position: usize,
    name: String,
    handle: JoinHandle<StageExit>,
    cancel: CancellationToken,
}

impl Worker {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request the worker to stop at its next wait point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    async fn join(self) -> StageExit {
        match self.handle.await {
            Ok(exit) => exit,
            Err(e) => {
                tracing::warn!(stage = %self.name, "worker did not finish: {}", e);
                StageExit::Panicked
            }
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("position", &self.position)
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// A launched pipeline.
#[derive(Debug)]
pub struct Job {
    command: String,
    mode: JobMode,
    workers: Vec<Worker>,
}

impl Job {
    /// Start one worker per stage, in chain order.
    ///
    /// Must be called from within a tokio runtime.
    #[tracing::instrument(level = "debug", skip_all, fields(command = %command, %mode, stages = chain.len()))]
    pub fn launch(chain: Chain, command: &str, mode: JobMode) -> Self {
        let workers = chain
            .into_stages()
            .into_iter()
            .map(|stage| {
                let cancel = CancellationToken::new();
                let position = stage.position();
                let name = stage.name().to_string();
                let handle = tokio::spawn(stage.run(cancel.clone()));
                Worker {
                    position,
                    name,
                    handle,
                    cancel,
                }
            })
            .collect();

        Self {
            command: command.to_string(),
            mode,
            workers,
        }
    }

    /// Command text as submitted.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn mode(&self) -> JobMode {
        self.mode
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Whether any worker is still running.
    pub fn is_alive(&self) -> bool {
        self.workers.iter().any(|w| !w.is_finished())
    }

    /// Cancel every worker, last stage first. Does not wait.
    pub fn interrupt(&self) {
        for worker in self.workers.iter().rev() {
            tracing::debug!(stage = %worker.name, position = worker.position, "cancelling worker");
            worker.cancel();
        }
    }

    /// Wait for the terminal stage only.
    ///
    /// Earlier stages may still be winding down when this returns.
    pub async fn wait(mut self) -> StageExit {
        match self.workers.pop() {
            Some(last) => last.join().await,
            None => StageExit::Completed,
        }
    }

    /// Wait for every worker, returning exits in chain order.
    pub async fn wait_all(self) -> Vec<StageExit> {
        let mut exits = Vec::with_capacity(self.workers.len());
        for worker in self.workers {
            exits.push(worker.join().await);
        }
        exits
    }
}
