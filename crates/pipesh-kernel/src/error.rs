//! Error types for pipeline construction, runtime faults and job control.
//!
//! The three enums map onto the three places a failure can surface:
//!
//! - [`ChainError`]: the command line cannot become a chain of stages. Raised
//!   before any worker starts, reported to the user.
//! - [`FilterError`]: a stage failed on an item at run time. Never reported as
//!   output; the stage turns it into an upstream-failure signal.
//! - [`JobControlError`]: a `kill` argument was missing or out of range.

use thiserror::Error;

use crate::lexer::LexerError;

/// Result type for chain construction.
pub type ChainResult<T> = Result<T, ChainError>;

/// A pipeline could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The command line did not tokenize or had an empty stage.
    #[error("Syntax error in [{command}]: {message}")]
    Syntax { command: String, message: String },

    /// There were no stages at all.
    #[error("The pipeline is empty.")]
    EmptyPipeline,

    /// No stage with that name is registered.
    #[error("The command [{0}] was not found.")]
    CommandNotFound(String),

    /// A filter was placed first, where nothing feeds it.
    #[error("The command [{0}] requires input.")]
    RequiresInput(String),

    /// A source was placed after another stage.
    #[error("The command [{0}] cannot have an input.")]
    CannotHaveInput(String),

    /// A stage needs arguments it did not get.
    #[error("The command [{0}] requires parameter(s).")]
    RequiresParameter(String),

    /// A stage argument could not be interpreted.
    #[error("The parameter for the command [{command}] is invalid: {reason}")]
    InvalidParameter { command: String, reason: String },

    /// A file named on the command line does not exist.
    #[error("At least one of the files in the command [{0}] was not found.")]
    FileNotFound(String),
}

impl ChainError {
    /// Build a syntax error from lexer diagnostics.
    pub fn from_lexer(command: &str, errors: &[crate::lexer::Spanned<LexerError>]) -> Self {
        let message = errors
            .iter()
            .map(|e| format!("{} at {}..{}", e.token, e.span.start, e.span.end))
            .collect::<Vec<_>>()
            .join(", ");
        ChainError::Syntax {
            command: command.to_string(),
            message,
        }
    }

    /// Shorthand for [`ChainError::InvalidParameter`].
    pub fn invalid(command: impl Into<String>, reason: impl Into<String>) -> Self {
        ChainError::InvalidParameter {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

/// A runtime fault inside one stage.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{stage}: {message}")]
    Fault { stage: String, message: String },
}

impl FilterError {
    pub fn fault(stage: impl Into<String>, message: impl Into<String>) -> Self {
        FilterError::Fault {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// A job-control command was given bad arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobControlError {
    /// `kill` with no usable job number.
    #[error("The command [{0}] requires parameter(s).")]
    RequiresParameter(String),

    /// `kill n` where n is not a registered background job.
    #[error("The parameter for the command [{command}] is invalid.")]
    InvalidJob { command: String, id: u64 },

    /// `kill n` where n is too large to ever name a job.
    #[error("The parameter for the command [{0}] is invalid.")]
    NoSuchJob(String),
}
