//! echo: Emit its arguments as a single line.

use crate::error::ChainResult;
use crate::stages::{BuildContext, LinesSource, StageBody, StageFactory, StageRole, StageSchema};

/// Echo stage: a source producing one line.
pub struct Echo;

impl StageFactory for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("echo", "Emit the arguments as one line", "echo [words...]", StageRole::Source)
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        Ok(StageBody::source(LinesSource::new([args.join(" ")])))
    }
}
