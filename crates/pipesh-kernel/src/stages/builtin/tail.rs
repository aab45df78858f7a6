//! tail: Keep the last N lines.

use std::collections::VecDeque;

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Filter, StageArgs, StageBody, StageFactory, StageRole, StageSchema};

use super::parse_count;

/// Tail stage: buffers and flushes at end of stream.
pub struct Tail;

impl StageFactory for Tail {
    fn name(&self) -> &str {
        "tail"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("tail", "Keep the last N lines (default 10)", "tail [-n N]", StageRole::Filter)
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        let args = StageArgs::parse(args, &["n"]);
        if !args.positional.is_empty() {
            return Err(ChainError::invalid("tail", "unexpected argument"));
        }
        let limit = parse_count("tail", &args, 10)?;
        Ok(StageBody::filter(Last {
            limit,
            window: VecDeque::with_capacity(limit.min(1024)),
        }))
    }
}

struct Last {
    limit: usize,
    window: VecDeque<String>,
}

impl Filter for Last {
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError> {
        if self.limit == 0 {
            return Ok(None);
        }
        if self.window.len() == self.limit {
            self.window.pop_front();
        }
        self.window.push_back(line);
        Ok(None)
    }

    fn finish(&mut self) -> Result<Vec<String>, FilterError> {
        Ok(self.window.drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_window() {
        let mut f = Last { limit: 2, window: VecDeque::new() };
        for l in ["1", "2", "3"] {
            assert_eq!(f.transform(l.to_string()).unwrap(), None);
        }
        assert_eq!(f.finish().unwrap(), vec!["2", "3"]);
    }
}
