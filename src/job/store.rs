//! Job registry.
//!
//! The store is the single authority on job state. The pipeline driver is
//! the only writer while a job is active; status and deletion queries may
//! run concurrently with it. Mutators called by the driver are silent
//! no-ops when the record is absent: a client may delete a running job,
//! and the in-flight pipeline must neither crash nor resurrect it.

use crate::error::{DiaristError, Result};
use crate::job::state::{JobSnapshot, JobStatus};
use crate::transcript::DiarizationResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Storage abstraction over the job registry.
///
/// The in-memory implementation below is the default; a durable store can
/// replace it without touching orchestration logic, which is why the trait
/// is async even though the in-memory operations never block.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Register a new job with status `queued` and progress 0.0.
    async fn create(&self, job_id: &str) -> Result<JobSnapshot>;

    /// Current snapshot of a job.
    async fn get(&self, job_id: &str) -> Result<JobSnapshot>;

    /// Transition `queued → processing`.
    async fn begin(&self, job_id: &str) -> Result<()>;

    /// Set progress while processing. Progress is monotonically
    /// non-decreasing; regressions and calls outside `processing` are
    /// programmer errors.
    async fn advance(&self, job_id: &str, fraction: f64) -> Result<()>;

    /// Transition `processing → completed`, storing the result and setting
    /// progress to 1.0.
    async fn complete(&self, job_id: &str, result: DiarizationResult) -> Result<()>;

    /// Transition any active state to `failed`, storing the error message.
    /// Idempotent: failing a terminal job is a no-op.
    async fn fail(&self, job_id: &str, error: String) -> Result<()>;

    /// Remove a job in any state. Deleting a running job does not
    /// interrupt its pipeline.
    async fn delete(&self, job_id: &str) -> Result<()>;

    /// Number of queued + processing jobs.
    async fn active_count(&self) -> usize;
}

#[derive(Debug)]
struct JobRecord {
    status: JobStatus,
    progress: f64,
    result: Option<DiarizationResult>,
    error: Option<String>,
    created_at: DateTime<Utc>,
}

impl JobRecord {
    fn snapshot(&self, job_id: &str) -> JobSnapshot {
        JobSnapshot {
            job_id: job_id.to_string(),
            status: self.status,
            progress: self.progress,
            result: self.result.clone(),
            error: self.error.clone(),
            created_at: self.created_at,
        }
    }
}

/// In-memory job registry with per-job locking.
///
/// The outer map lock is held only long enough to clone the per-job Arc,
/// so operations on one job are linearizable without blocking unrelated
/// jobs.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, Arc<Mutex<JobRecord>>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, job_id: &str) -> Option<Arc<Mutex<JobRecord>>> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job_id)
            .cloned()
    }
}

fn lock(record: &Mutex<JobRecord>) -> MutexGuard<'_, JobRecord> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job_id: &str) -> Result<JobSnapshot> {
        let record = JobRecord {
            status: JobStatus::Queued,
            progress: 0.0,
            result: None,
            error: None,
            created_at: Utc::now(),
        };
        let snapshot = record.snapshot(job_id);

        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        if jobs.contains_key(job_id) {
            return Err(DiaristError::DuplicateJob {
                job_id: job_id.to_string(),
            });
        }
        jobs.insert(job_id.to_string(), Arc::new(Mutex::new(record)));
        Ok(snapshot)
    }

    async fn get(&self, job_id: &str) -> Result<JobSnapshot> {
        let record = self.record(job_id).ok_or_else(|| DiaristError::JobNotFound {
            job_id: job_id.to_string(),
        })?;
        let guard = lock(&record);
        Ok(guard.snapshot(job_id))
    }

    async fn begin(&self, job_id: &str) -> Result<()> {
        let Some(record) = self.record(job_id) else {
            return Ok(());
        };
        let mut guard = lock(&record);
        if guard.status != JobStatus::Queued {
            return Err(DiaristError::InvalidState {
                job_id: job_id.to_string(),
                message: format!("cannot begin from {}", guard.status),
            });
        }
        guard.status = JobStatus::Processing;
        Ok(())
    }

    async fn advance(&self, job_id: &str, fraction: f64) -> Result<()> {
        let Some(record) = self.record(job_id) else {
            return Ok(());
        };
        let mut guard = lock(&record);
        if guard.status != JobStatus::Processing {
            return Err(DiaristError::InvalidState {
                job_id: job_id.to_string(),
                message: format!("cannot advance progress while {}", guard.status),
            });
        }
        if fraction < guard.progress {
            return Err(DiaristError::InvalidProgress {
                job_id: job_id.to_string(),
                current: guard.progress,
                requested: fraction,
            });
        }
        guard.progress = fraction;
        Ok(())
    }

    async fn complete(&self, job_id: &str, result: DiarizationResult) -> Result<()> {
        let Some(record) = self.record(job_id) else {
            return Ok(());
        };
        let mut guard = lock(&record);
        if guard.status != JobStatus::Processing {
            return Err(DiaristError::InvalidState {
                job_id: job_id.to_string(),
                message: format!("cannot complete from {}", guard.status),
            });
        }
        guard.status = JobStatus::Completed;
        guard.progress = crate::defaults::PROGRESS_COMPLETE;
        guard.result = Some(result);
        Ok(())
    }

    async fn fail(&self, job_id: &str, error: String) -> Result<()> {
        let Some(record) = self.record(job_id) else {
            return Ok(());
        };
        let mut guard = lock(&record);
        if guard.status.is_terminal() {
            return Ok(());
        }
        guard.status = JobStatus::Failed;
        guard.error = Some(error);
        Ok(())
    }

    async fn delete(&self, job_id: &str) -> Result<()> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        jobs.remove(job_id)
            .map(|_| ())
            .ok_or_else(|| DiaristError::JobNotFound {
                job_id: job_id.to_string(),
            })
    }

    async fn active_count(&self) -> usize {
        let records: Vec<Arc<Mutex<JobRecord>>> = {
            let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
            jobs.values().cloned().collect()
        };
        records
            .iter()
            .filter(|record| lock(record).status.is_active())
            .count()
    }
}
