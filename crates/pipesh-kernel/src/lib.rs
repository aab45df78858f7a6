//! pipesh-kernel: concurrent filter pipelines for pipesh.
//!
//! This crate provides:
//!
//! - **Lexer**: Tokenizes command lines using logos
//! - **Parser**: Splits a command line into stage specifications
//! - **Stages**: Stage factory trait, registry, and builtin stages
//! - **Scheduler**: Stages, bounded channels, chain builder, jobs and the job table
//! - **Kernel**: The context object tying registry, job table and sink together

pub mod error;
pub mod kernel;
pub mod lexer;
pub mod parser;
pub mod scheduler;
pub mod stages;

pub use error::{ChainError, ChainResult, FilterError, JobControlError};
pub use kernel::{strip_background_suffix, Kernel, KernelConfig, Launched};
pub use scheduler::{
    Chain, ChainBuilder, CollectSink, Job, JobTable, Sink, StageExit, StdoutSink,
};
pub use stages::{Filter, Source, StageFactory, StageRegistry};

pub use pipesh_types::{ControlSignal, Item, JobId, JobInfo, JobMode, JobStatus};
