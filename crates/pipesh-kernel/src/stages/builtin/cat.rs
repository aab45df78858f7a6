//! cat: Emit the lines of one or more files.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Source, StageBody, StageFactory, StageRole, StageSchema};

/// Cat stage: a source reading files in order.
pub struct Cat;

impl StageFactory for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("cat", "Emit the lines of files in order", "cat <file>...", StageRole::Source)
    }

    fn build(&self, args: &[String], ctx: &BuildContext) -> ChainResult<StageBody> {
        if args.is_empty() {
            return Err(ChainError::RequiresParameter("cat".to_string()));
        }

        let paths: Vec<PathBuf> = args.iter().map(|a| ctx.resolve_path(a)).collect();
        if paths.iter().any(|p| !p.exists()) {
            return Err(ChainError::FileNotFound(format!("cat {}", args.join(" "))));
        }

        Ok(StageBody::source(FileLines::new(paths)))
    }
}

/// Reads each file when the previous one is exhausted.
///
/// Existence is checked at build time; anything that goes wrong while reading
/// (a directory, a file removed in between, invalid UTF-8) is a runtime fault.
struct FileLines {
    pending: VecDeque<PathBuf>,
    current: VecDeque<String>,
}

impl FileLines {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            pending: paths.into(),
            current: VecDeque::new(),
        }
    }
}

#[async_trait]
impl Source for FileLines {
    async fn next_line(&mut self) -> Result<Option<String>, FilterError> {
        loop {
            if let Some(line) = self.current.pop_front() {
                return Ok(Some(line));
            }
            let Some(path) = self.pending.pop_front() else {
                return Ok(None);
            };
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| FilterError::fault("cat", format!("{}: {}", path.display(), e)))?;
            self.current = content.lines().map(String::from).collect();
        }
    }
}
