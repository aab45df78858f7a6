//! Bounded item channels between stages, and the sink behind the last stage.
//!
//! ```text
//!   ItemSender ──▶ [tokio mpsc, capacity N] ──▶ ItemReceiver
//!                  ├── sender waits when full (backpressure)
//!                  ├── receiver waits when empty
//!                  ├── drop sender → receiver drains, then sees closed
//!                  └── drop receiver → send fails (broken pipe)
//! ```
//!
//! Every channel connects exactly one producer stage to one consumer stage,
//! so neither end is `Clone`-shared.

use std::io::Write;
use std::sync::{Arc, Mutex};

use pipesh_types::Item;
use tokio::sync::mpsc;

/// Default channel capacity, in items.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Producing end of a stage channel.
pub type ItemSender = mpsc::Sender<Item<String>>;

/// Consuming end of a stage channel.
pub type ItemReceiver = mpsc::Receiver<Item<String>>;

/// Create a bounded channel pair. A capacity of zero is raised to one.
pub fn stage_channel(capacity: usize) -> (ItemSender, ItemReceiver) {
    mpsc::channel(capacity.max(1))
}

/// Where the last stage of a chain delivers its lines.
pub trait Sink: Send + Sync {
    fn emit(&self, line: String);
}

/// Writes each line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn emit(&self, line: String) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::debug!("stdout write failed: {}", e);
        }
    }
}

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CollectSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Take everything emitted so far, leaving the buffer empty.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Sink for CollectSink {
    fn emit(&self, line: String) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).push(line);
    }
}
