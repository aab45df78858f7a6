//! Core stage traits and types.
//!
//! A stage is built from one of two capabilities:
//!
//! - [`Source`]: an external producer that feeds the first stage of a chain.
//! - [`Filter`]: a per-item transform applied by every later stage.
//!
//! [`StageFactory`] turns a parsed command segment into one of these.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{ChainResult, FilterError};

/// Where a stage may appear in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageRole {
    /// Produces data; must be first.
    Source,
    /// Consumes data; must not be first.
    Filter,
}

/// Schema describing a stage's interface, for help and listing.
#[derive(Debug, Clone)]
pub struct StageSchema {
    /// Stage name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Usage line, e.g. `head [-n N]`.
    pub usage: String,
    /// Where the stage may appear.
    pub role: StageRole,
}

impl StageSchema {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        usage: impl Into<String>,
        role: StageRole,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            usage: usage.into(),
            role,
        }
    }
}

/// Per-item transform contract.
///
/// `transform` is only ever called with data; control signals are handled by
/// the stage runner and never reach a filter.
pub trait Filter: Send {
    /// Transform one line. `Ok(None)` drops it; `Err` aborts the run.
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError>;

    /// Lines to emit once end-of-stream arrives, before it is forwarded.
    fn finish(&mut self) -> Result<Vec<String>, FilterError> {
        Ok(Vec::new())
    }
}

/// External producer for the head of a chain.
#[async_trait]
pub trait Source: Send {
    /// Next line, or `None` once exhausted.
    async fn next_line(&mut self) -> Result<Option<String>, FilterError>;
}

/// Identity filter used by source stages.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Filter for Passthrough {
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError> {
        Ok(Some(line))
    }
}

/// Source over a fixed list of lines.
#[derive(Debug, Default)]
pub struct LinesSource {
    lines: std::collections::VecDeque<String>,
}

impl LinesSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Source for LinesSource {
    async fn next_line(&mut self) -> Result<Option<String>, FilterError> {
        Ok(self.lines.pop_front())
    }
}

/// What a factory produces.
pub enum StageBody {
    Source(Box<dyn Source>),
    Filter(Box<dyn Filter>),
}

impl StageBody {
    pub fn source(source: impl Source + 'static) -> Self {
        StageBody::Source(Box::new(source))
    }

    pub fn filter(filter: impl Filter + 'static) -> Self {
        StageBody::Filter(Box::new(filter))
    }
}

impl std::fmt::Debug for StageBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageBody::Source(_) => f.write_str("StageBody::Source"),
            StageBody::Filter(_) => f.write_str("StageBody::Filter"),
        }
    }
}

/// Context available to factories while building a stage.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Working directory that relative paths resolve against.
    pub cwd: PathBuf,
}

impl BuildContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Resolve a path argument against the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.cwd.join(p)
        }
    }
}

/// Parsed stage arguments.
#[derive(Debug, Clone, Default)]
pub struct StageArgs {
    /// Positional arguments in order.
    pub positional: Vec<String>,
    /// Options that take a value, e.g. `-n 5`.
    pub named: HashMap<String, String>,
    /// Boolean flags (e.g., -i, --invert).
    pub flags: HashSet<String>,
}

impl StageArgs {
    /// Split raw words into flags, valued options and positionals.
    ///
    /// `valued` lists the option names that consume the following word.
    /// Combined short flags like `-iv` expand to `i` and `v`. A bare `--` ends
    /// option parsing.
    pub fn parse(words: &[String], valued: &[&str]) -> Self {
        let mut args = StageArgs::default();
        let mut iter = words.iter();
        let mut options_done = false;

        while let Some(word) = iter.next() {
            if options_done || word == "-" || !word.starts_with('-') {
                args.positional.push(word.clone());
                continue;
            }
            if word == "--" {
                options_done = true;
                continue;
            }

            let name = word.trim_start_matches('-');
            if valued.contains(&name) {
                match iter.next() {
                    Some(value) => {
                        args.named.insert(name.to_string(), value.clone());
                    }
                    None => {
                        args.named.insert(name.to_string(), String::new());
                    }
                }
            } else if word.starts_with("--") {
                args.flags.insert(name.to_string());
            } else {
                for c in name.chars() {
                    args.flags.insert(c.to_string());
                }
            }
        }

        args
    }

    /// Check if a flag is set under either of its spellings.
    pub fn has_flag(&self, short: &str, long: &str) -> bool {
        self.flags.contains(short) || self.flags.contains(long)
    }

    pub fn get_named(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }
}

/// Builds stages of one kind from command-line words.
pub trait StageFactory: Send + Sync {
    /// The stage's name (used for lookup).
    fn name(&self) -> &str;

    /// Get the stage's schema.
    fn schema(&self) -> StageSchema;

    /// Build a stage body from its arguments.
    fn build(&self, args: &[String], ctx: &BuildContext) -> ChainResult<StageBody>;
}
