//! Scheduler module for pipesh: stages, chains, jobs and the job table.
//!
//! This module provides:
//! - **Stage execution**: each stage runs as its own tokio task and talks to
//!   its neighbours only through bounded channels of [`Item`]s.
//! - **Jobs**: a launched chain, waited on in the foreground or tracked in the
//!   [`JobTable`] in the background.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ChainBuilder                          │
//! │  ┌─────────┐  Item chan  ┌─────────┐  Item chan  ┌────────┐  │
//! │  │ stage 0 │────────────▶│ stage 1 │────────────▶│ stage 2│──▶ Sink
//! │  │ (Source)│   bounded   │ (Filter)│   bounded   │(Filter)│  │
//! │  └─────────┘             └─────────┘             └────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         JobTable                             │
//! │  entries: Mutex<Vec<Entry>>   (id = index + 1)               │
//! │  - register(job) → JobId                                     │
//! │  - list_alive() → Vec<JobInfo>                               │
//! │  - interrupt(JobId) → cancel workers, last first             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Item`]: pipesh_types::Item

mod chain;
mod channel;
mod job;
mod stage;
mod table;

pub use chain::{Chain, ChainBuilder};
pub use channel::{
    stage_channel, CollectSink, ItemReceiver, ItemSender, Sink, StdoutSink, DEFAULT_CHANNEL_CAPACITY,
};
pub use job::{Job, Worker};
pub use stage::{Stage, StageExit, StageInput, StageOutput};
pub use table::JobTable;
