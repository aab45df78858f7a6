//! Pure data types for pipesh: channel items, control signals, job identity.
//!
//! This crate is a leaf dependency with no async runtime and no I/O, so that
//! filters written outside the kernel can speak the pipeline protocol without
//! pulling in tokio.

pub mod item;
pub mod job;

// Flat re-exports for convenience
pub use item::*;
pub use job::*;
