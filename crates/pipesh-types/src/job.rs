//! Job identification and status types.

/// Unique identifier for a background job.
///
/// Ids are assigned sequentially from 1 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the submitting caller waits for the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    /// Caller blocks until the terminal stage has exited.
    Foreground,
    /// Caller continues immediately; the job is tracked in the job table.
    Background,
}

impl std::fmt::Display for JobMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobMode::Foreground => write!(f, "foreground"),
            JobMode::Background => write!(f, "background"),
        }
    }
}

/// Status of a background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// At least one worker is still running.
    Running,
    /// Every worker has exited.
    Done,
    /// The job was interrupted with `kill`.
    Interrupted,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Done => write!(f, "Done"),
            JobStatus::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// Information about a job for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    /// Job ID.
    pub id: JobId,
    /// Command text exactly as the user typed it.
    pub command: String,
    /// Current status.
    pub status: JobStatus,
}
