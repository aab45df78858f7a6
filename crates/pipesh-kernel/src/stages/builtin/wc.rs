//! wc: Count lines, words and characters.

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Filter, StageBody, StageFactory, StageRole, StageSchema};

/// Wc stage: emits `"<lines> <words> <chars>"` at end of stream.
pub struct Wc;

impl StageFactory for Wc {
    fn name(&self) -> &str {
        "wc"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("wc", "Count lines, words and characters", "wc", StageRole::Filter)
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        if !args.is_empty() {
            return Err(ChainError::invalid("wc", "takes no arguments"));
        }
        Ok(StageBody::filter(Counts::default()))
    }
}

#[derive(Default)]
struct Counts {
    lines: usize,
    words: usize,
    chars: usize,
}

impl Filter for Counts {
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError> {
        self.lines += 1;
        self.words += line.split_whitespace().count();
        self.chars += line.chars().count();
        Ok(None)
    }

    fn finish(&mut self) -> Result<Vec<String>, FilterError> {
        Ok(vec![format!("{} {} {}", self.lines, self.words, self.chars)])
    }
}
