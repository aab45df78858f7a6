//! One pipeline stage and the termination protocol it follows.
//!
//! A stage loops over its input:
//!
//! - data is passed to [`Filter::transform`]; a result is emitted, `None` is
//!   dropped, an error turns into `UpstreamFailure` and ends the stage;
//! - `EndOfStream` flushes [`Filter::finish`], is forwarded, ends the stage;
//! - `UpstreamFailure` is forwarded unchanged and ends the stage.
//!
//! Control values are never transformed and nothing is emitted after one is
//! forwarded. Cancellation at any wait point ends the stage without
//! forwarding anything; dropping the channel ends then tells the neighbours.

use std::sync::Arc;

use pipesh_types::{ControlSignal, Item};
use tokio_util::sync::CancellationToken;

use crate::error::FilterError;
use crate::stages::{Filter, Source};

use super::channel::{ItemReceiver, ItemSender, Sink};

/// How a stage's worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageExit {
    /// Saw (or synthesized) end-of-stream and forwarded it.
    Completed,
    /// Received upstream-failure and forwarded it.
    Aborted,
    /// Its own filter or source faulted; forwarded upstream-failure.
    Failed,
    /// Cancelled at a wait point; forwarded nothing.
    Cancelled,
    /// A neighbouring channel closed without a control value; forwarded nothing.
    Disconnected,
    /// The worker task panicked or was aborted by the runtime.
    Panicked,
}

impl StageExit {
    /// Whether the stage forwarded a control signal before exiting.
    pub fn forwarded_signal(&self) -> bool {
        matches!(self, StageExit::Completed | StageExit::Aborted | StageExit::Failed)
    }
}

impl std::fmt::Display for StageExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StageExit::Completed => "completed",
            StageExit::Aborted => "aborted",
            StageExit::Failed => "failed",
            StageExit::Cancelled => "cancelled",
            StageExit::Disconnected => "disconnected",
            StageExit::Panicked => "panicked",
        };
        f.write_str(s)
    }
}

/// Where a stage reads from.
pub enum StageInput {
    /// External producer; only the first stage has one.
    Source(Box<dyn Source>),
    /// Channel from the previous stage.
    Channel(ItemReceiver),
}

/// Where a stage writes to.
pub enum StageOutput {
    /// Channel to the next stage.
    Channel(ItemSender),
    /// External consumer; only the last stage has one.
    Sink(Arc<dyn Sink>),
}

enum Inbound {
    Item(Item<String>),
    Fault(FilterError),
    Closed,
}

impl StageInput {
    async fn next(&mut self) -> Inbound {
        match self {
            StageInput::Channel(rx) => match rx.recv().await {
                Some(item) => Inbound::Item(item),
                None => Inbound::Closed,
            },
            StageInput::Source(source) => match source.next_line().await {
                Ok(Some(line)) => Inbound::Item(Item::Data(line)),
                Ok(None) => Inbound::Item(Item::EndOfStream),
                Err(e) => Inbound::Fault(e),
            },
        }
    }
}

impl StageOutput {
    /// Deliver one item, waiting for capacity. `Err` carries the exit reason.
    async fn emit(&mut self, item: Item<String>, cancel: &CancellationToken) -> Result<(), StageExit> {
        match self {
            StageOutput::Channel(tx) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(StageExit::Cancelled),
                    sent = tx.send(item) => sent.map_err(|_| StageExit::Disconnected),
                }
            }
            StageOutput::Sink(sink) => {
                if let Some(line) = item.into_data() {
                    sink.emit(line);
                }
                Ok(())
            }
        }
    }
}

/// One link of a chain.
///
/// A stage only knows its neighbours through its input and output channels.
pub struct Stage {
    position: usize,
    name: String,
    input: StageInput,
    filter: Box<dyn Filter>,
    output: StageOutput,
}

impl Stage {
    pub fn new(
        position: usize,
        name: impl Into<String>,
        input: StageInput,
        filter: Box<dyn Filter>,
        output: StageOutput,
    ) -> Self {
        Self {
            position,
            name: name.into(),
            input,
            filter,
            output,
        }
    }

    /// Zero-based position in the chain.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether input comes from another stage rather than a source.
    pub fn has_channel_input(&self) -> bool {
        matches!(self.input, StageInput::Channel(_))
    }

    /// Whether output goes to another stage rather than the sink.
    pub fn has_channel_output(&self) -> bool {
        matches!(self.output, StageOutput::Channel(_))
    }

    /// Run until a control signal, a fault, a closed channel or cancellation.
    #[tracing::instrument(level = "debug", skip_all, fields(stage = %self.name, position = self.position))]
    pub async fn run(mut self, cancel: CancellationToken) -> StageExit {
        let exit = self.pump(&cancel).await;
        tracing::debug!(%exit, "stage exited");
        exit
    }

    async fn pump(&mut self, cancel: &CancellationToken) -> StageExit {
        loop {
            let inbound = tokio::select! {
                biased;
                _ = cancel.cancelled() => return StageExit::Cancelled,
                inbound = self.input.next() => inbound,
            };

            match inbound {
                Inbound::Closed => return StageExit::Disconnected,
                Inbound::Fault(err) => return self.fail(err, cancel).await,
                Inbound::Item(Item::UpstreamFailure) => {
                    return self.forward(ControlSignal::UpstreamFailure, StageExit::Aborted, cancel).await;
                }
                Inbound::Item(Item::EndOfStream) => {
                    let tail = match self.filter.finish() {
                        Ok(lines) => lines,
                        Err(err) => return self.fail(err, cancel).await,
                    };
                    for line in tail {
                        if let Err(exit) = self.output.emit(Item::Data(line), cancel).await {
                            return exit;
                        }
                    }
                    return self.forward(ControlSignal::EndOfStream, StageExit::Completed, cancel).await;
                }
                Inbound::Item(Item::Data(line)) => match self.filter.transform(line) {
                    Ok(Some(out)) => {
                        if let Err(exit) = self.output.emit(Item::Data(out), cancel).await {
                            return exit;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => return self.fail(err, cancel).await,
                },
            }
        }
    }

    async fn fail(&mut self, err: FilterError, cancel: &CancellationToken) -> StageExit {
        tracing::warn!(stage = %self.name, "stage fault: {}", err);
        self.forward(ControlSignal::UpstreamFailure, StageExit::Failed, cancel).await
    }

    async fn forward(&mut self, signal: ControlSignal, exit: StageExit, cancel: &CancellationToken) -> StageExit {
        match self.output.emit(signal.into(), cancel).await {
            Ok(()) => exit,
            Err(other) => other,
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("position", &self.position)
            .field("name", &self.name)
            .field("channel_input", &self.has_channel_input())
            .field("channel_output", &self.has_channel_output())
            .finish()
    }
}
