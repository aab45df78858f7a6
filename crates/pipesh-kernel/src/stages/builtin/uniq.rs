//! uniq: Drop lines that have already been seen.
//!
//! Unlike the POSIX tool this is not limited to adjacent duplicates: every
//! line seen during the run is remembered.

use std::collections::HashSet;

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Filter, StageBody, StageFactory, StageRole, StageSchema};

/// Uniq stage.
pub struct Uniq;

impl StageFactory for Uniq {
    fn name(&self) -> &str {
        "uniq"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("uniq", "Drop lines already seen in this run", "uniq", StageRole::Filter)
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        if !args.is_empty() {
            return Err(ChainError::invalid("uniq", "takes no arguments"));
        }
        Ok(StageBody::filter(Seen::default()))
    }
}

#[derive(Default)]
struct Seen {
    lines: HashSet<String>,
}

impl Filter for Seen {
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError> {
        if self.lines.contains(&line) {
            return Ok(None);
        }
        self.lines.insert(line.clone());
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniq_drops_non_adjacent_repeats() {
        let mut f = Seen::default();
        let out: Vec<_> = ["a", "b", "a", "c", "b"]
            .into_iter()
            .filter_map(|l| f.transform(l.to_string()).unwrap())
            .collect();
        assert_eq!(out, vec!["a", "b", "c"]);
    }
}
