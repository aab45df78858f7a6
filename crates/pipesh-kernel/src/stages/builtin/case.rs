//! uppercase, lowercase: Case mapping filters.

use crate::error::{ChainError, ChainResult, FilterError};
use crate::stages::{BuildContext, Filter, StageBody, StageFactory, StageRole, StageSchema};

/// Uppercase stage.
pub struct Uppercase;

/// Lowercase stage.
pub struct Lowercase;

struct MapCase {
    upper: bool,
}

impl Filter for MapCase {
    fn transform(&mut self, line: String) -> Result<Option<String>, FilterError> {
        if self.upper {
            Ok(Some(line.to_uppercase()))
        } else {
            Ok(Some(line.to_lowercase()))
        }
    }
}

fn build_case(name: &str, args: &[String], upper: bool) -> ChainResult<StageBody> {
    if !args.is_empty() {
        return Err(ChainError::invalid(name, "takes no arguments"));
    }
    Ok(StageBody::filter(MapCase { upper }))
}

impl StageFactory for Uppercase {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("uppercase", "Convert lines to upper case", "uppercase", StageRole::Filter)
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        build_case("uppercase", args, true)
    }
}

impl StageFactory for Lowercase {
    fn name(&self) -> &str {
        "lowercase"
    }

    fn schema(&self) -> StageSchema {
        StageSchema::new("lowercase", "Convert lines to lower case", "lowercase", StageRole::Filter)
    }

    fn build(&self, args: &[String], _ctx: &BuildContext) -> ChainResult<StageBody> {
        build_case("lowercase", args, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_mapping() {
        let mut up = MapCase { upper: true };
        let mut down = MapCase { upper: false };
        assert_eq!(up.transform("MiXed".into()).unwrap().as_deref(), Some("MIXED"));
        assert_eq!(down.transform("MiXed".into()).unwrap().as_deref(), Some("mixed"));
    }
}
