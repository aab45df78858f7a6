//! head: Keep the first N lines.

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Filter, StageArgs, StageBody, StageFactory, StageRole, StageSchema};

use super::parse_count;

/// Head stage.
pub struct Head;

impl StageFactory for Head {
    fn name(&self) -> &str {
        "head"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("head", "Keep the first N lines (default 10)", "head [-n N]", StageRole::Filter)
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        let args = StageArgs::parse(args, &["n"]);
        if !args.positional.is_empty() {
            return Err(ChainError::invalid("head", "unexpected argument"));
        }
        let limit = parse_count("head", &args, 10)?;
        Ok(StageBody::filter(First { limit, seen: 0 }))
    }
}

struct First {
    limit: usize,
    seen: usize,
}

impl Filter for First {
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError> {
        if self.seen >= self.limit {
            return Ok(None);
        }
        self.seen += 1;
        Ok(Some(line))
    }
}
