//! pwd: Print working directory.

use crate::error::{ChainError, ChainResult};
use crate::stages::{BuildContext, LinesSource, StageBody, StageFactory, StageRole, StageSchema};

/// Pwd stage: emits the working directory.
pub struct Pwd;

impl StageFactory for Pwd {
    fn name(&self) -> &str {
        "pwd"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("pwd", "Print the working directory", "pwd", StageRole::Source)
    }

    fn build(&self, args: &[String], ctx: &BuildContext) -> ChainResult<StageBody> {
        if !args.is_empty() {
            return Err(ChainError::invalid("pwd", "takes no arguments"));
        }
        Ok(StageBody::source(LinesSource::new([ctx.cwd.display().to_string()])))
    }
}
