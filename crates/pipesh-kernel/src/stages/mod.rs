//! Stage system for pipesh.
//!
//! Every pipeline segment is built by a [`StageFactory`] looked up by name in
//! the [`StageRegistry`]. Factories produce either a [`Source`] (first stage
//! only) or a [`Filter`] (every later stage).
//!
//! # Architecture
//!
//! ```text
//! StageRegistry
//! ├── Sources (echo, cat, ls, pwd, sleep)
//! └── Filters (grep, uniq, uppercase, lowercase, head, tail, wc)
//! ```

mod builtin;
mod registry;
mod traits;

pub use builtin::register_builtins;
pub use registry::StageRegistry;
pub use traits::{
    BuildContext, Filter, LinesSource, Passthrough, Source, StageArgs, StageBody, StageFactory,
    StageRole, StageSchema,
};
