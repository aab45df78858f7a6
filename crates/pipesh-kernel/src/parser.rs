//! Parser for pipesh command lines.
//!
//! Turns the lexer's token stream into an ordered list of [`StageSpec`]s, one
//! per `|`-separated segment. Only the shape of the pipeline is checked here;
//! whether a stage name exists is the registry's business.

use crate::error::{ChainError, ChainResult};
use crate::lexer::{self, Token};

/// One stage as written on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    /// Stage name (first word of the segment).
    pub name: String,
    /// Remaining words, quotes already removed.
    pub args: Vec<String>,
}

impl StageSpec {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The segment rebuilt as text, for messages.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.args.join(" "))
        }
    }
}

/// Parse a command line into its stage specifications.
///
/// An empty line yields [`ChainError::EmptyPipeline`]; a dangling or doubled
/// `|` yields a syntax error.
pub fn parse(source: &str) -> ChainResult<Vec<StageSpec>> {
    let tokens = lexer::tokenize(source).map_err(|errors| ChainError::from_lexer(source, &errors))?;

    if tokens.is_empty() {
        return Err(ChainError::EmptyPipeline);
    }

    let mut stages = Vec::new();
    let mut words: Vec<String> = Vec::new();

    for spanned in tokens {
        match spanned.token {
            Token::Pipe => {
                stages.push(finish_segment(source, std::mem::take(&mut words), spanned.span.start)?);
            }
            other => {
                if let Some(word) = other.as_word() {
                    words.push(word.to_string());
                }
            }
        }
    }
    stages.push(finish_segment(source, words, source.len())?);

    Ok(stages)
}

fn finish_segment(source: &str, words: Vec<String>, at: usize) -> ChainResult<StageSpec> {
    let mut words = words.into_iter();
    match words.next() {
        Some(name) => Ok(StageSpec::new(name, words.collect())),
        None => Err(ChainError::Syntax {
            command: source.to_string(),
            message: format!("empty pipeline stage at {}", at),
        }),
    }
}
