//! Built-in stages for pipesh.
//!
//! These stages are always available.

mod case;
mod cat;
mod echo;
mod grep;
mod head;
mod ls;
mod pwd;
mod sleep;
mod tail;
mod uniq;
mod wc;

use super::StageRegistry;

/// Register all built-in stages with the registry.
pub fn register_builtins(registry: &mut StageRegistry) {
    registry.register(case::Uppercase);
    registry.register(case::Lowercase);
    registry.register(cat::Cat);
    registry.register(echo::Echo);
    registry.register(grep::Grep);
    registry.register(head::Head);
    registry.register(ls::Ls);
    registry.register(pwd::Pwd);
    registry.register(sleep::Sleep);
    registry.register(tail::Tail);
    registry.register(uniq::Uniq);
    registry.register(wc::Wc);
}

/// Parse a `-n N` line count shared by head and tail.
pub(crate) fn parse_count(
    command: &str,
    args: &super::StageArgs,
    default: usize,
) -> crate::error::ChainResult<usize> {
    match args.get_named("n") {
        None => Ok(default),
        Some("") => Err(crate::error::ChainError::RequiresParameter(format!("{} -n", command))),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| crate::error::ChainError::invalid(command, format!("invalid line count '{}'", raw))),
    }
}
