//! ls: List the working directory.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Source, StageBody, StageFactory, StageRole, StageSchema};

/// Ls stage: emits entry names of the working directory, sorted.
pub struct Ls;

impl StageFactory for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("ls", "List the working directory", "ls", StageRole::Source)
    }

    fn build(&self, args: &[String], ctx: &BuildContext) -> ChainResult<StageBody> {
        if !args.is_empty() {
            return Err(ChainError::invalid("ls", "takes no arguments"));
        }
        Ok(StageBody::source(DirEntries {
            dir: ctx.cwd.clone(),
            entries: None,
        }))
    }
}

struct DirEntries {
    dir: PathBuf,
    entries: Option<VecDeque<String>>,
}

impl DirEntries {
    async fn read(&self) -> std::io::Result<VecDeque<String>> {
        let mut reader = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names.into())
    }
}

#[async_trait]
impl Source for DirEntries {
    async fn next_line(&mut self) -> Result<Option<String>, FilterError> {
        if self.entries.is_none() {
            self.entries = Some(self.read().await?);
        }
        Ok(self.entries.as_mut().and_then(|e| e.pop_front()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ls_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b"), "").unwrap();
        std::fs::write(dir.path().join("a"), "").unwrap();

        let StageBody::Source(mut source) = Ls.build(&[], &BuildContext::new(dir.path())).unwrap() else {
            panic!("ls should be a source");
        };
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("a"));
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("b"));
        assert_eq!(source.next_line().await.unwrap(), None);
    }
}
