//! Registry of background jobs.
//!
//! Ids are positions in an append-only vector, starting at 1. Entries are
//! never removed; a killed entry is only flagged.

use std::sync::Mutex;

use pipesh_types::{JobId, JobInfo, JobStatus};

use crate::error::JobControlError;

use super::job::Job;

struct Entry {
    job: Job,
    interrupted: bool,
}

impl Entry {
    fn status(&self) -> JobStatus {
        if self.interrupted {
            JobStatus::Interrupted
        } else if self.job.is_alive() {
            JobStatus::Running
        } else {
            JobStatus::Done
        }
    }

    fn info(&self, index: usize) -> JobInfo {
        JobInfo {
            id: JobId(index as u64 + 1),
            command: self.job.command().to_string(),
            status: self.status(),
        }
    }
}

/// Background jobs by sequential id.
#[derive(Default)]
pub struct JobTable {
    entries: Mutex<Vec<Entry>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a launched job and assign it the next id.
    pub fn register(&self, job: Job) -> JobId {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(Entry { job, interrupted: false });
        let id = JobId(entries.len() as u64);
        tracing::debug!(%id, "registered background job");
        id
    }

    /// Jobs with at least one live worker, ascending by id.
    ///
    /// Interrupted jobs are left out even while their workers wind down.
    pub fn list_alive(&self) -> Vec<JobInfo> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.status() == JobStatus::Running)
            .map(|(index, entry)| entry.info(index))
            .collect()
    }

    /// Every registered job with its status.
    pub fn list(&self) -> Vec<JobInfo> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().enumerate().map(|(index, entry)| entry.info(index)).collect()
    }

    pub fn get(&self, id: JobId) -> Option<JobInfo> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let index = Self::index(id, entries.len())?;
        entries.get(index).map(|entry| entry.info(index))
    }

    /// Cancel every worker of a job, last stage first, without waiting.
    ///
    /// An id outside `1..=len()` is rejected and nothing changes.
    pub fn interrupt(&self, id: JobId) -> Result<(), JobControlError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let Some(index) = Self::index(id, entries.len()) else {
            return Err(JobControlError::InvalidJob {
                command: format!("kill {}", id),
                id: id.0,
            });
        };

        let entry = &mut entries[index];
        entry.job.interrupt();
        entry.interrupted = true;
        tracing::debug!(%id, "interrupted background job");
        Ok(())
    }

    /// Number of jobs ever registered.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of jobs currently listed by [`JobTable::list_alive`].
    pub fn running_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|entry| entry.status() == JobStatus::Running)
            .count()
    }

    fn index(id: JobId, len: usize) -> Option<usize> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        (index < len).then_some(index)
    }
}

impl std::fmt::Debug for JobTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTable").field("jobs", &self.list()).finish()
    }
}
