//! grep: Keep lines matching a pattern.

use regex::{Regex, RegexBuilder};

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Filter, StageArgs, StageBody, StageFactory, StageRole, StageSchema};

/// Grep stage: regex line filter.
pub struct Grep;

impl StageFactory for Grep {
    fn name(&self) -> &str {
        "grep"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new(
            "grep",
            "Keep lines matching a regular expression (-i ignore case, -v invert)",
            "grep [-iv] <pattern>",
            StageRole::Filter,
        )
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        let args = StageArgs::parse(args, &[]);
        let pattern = match args.positional.as_slice() {
            [] => return Err(ChainError::RequiresParameter("grep".to_string())),
            [pattern] => pattern,
            _ => return Err(ChainError::invalid("grep", "expects a single pattern")),
        };

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(args.has_flag("i", "ignore-case"))
            .build()
            .map_err(|e| ChainError::invalid(format!("grep {}", pattern), e.to_string()))?;

        Ok(StageBody::filter(Matcher {
            regex,
            invert: args.has_flag("v", "invert"),
        }))
    }
}

struct Matcher {
    regex: Regex,
    invert: bool,
}

impl Filter for Matcher {
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError> {
        if self.regex.is_match(&line) != self.invert {
            Ok(Some(line))
        } else {
            Ok(None)
        }
    }
}
