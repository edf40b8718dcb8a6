use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::pipeline::progress::JobPhase;

/// How a job was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOrigin {
    /// Found by the startup scan; processed immediately.
    Scan,
    /// Reported by the watcher; processed after the settle delay.
    Watch,
}

impl JobOrigin {
    pub fn settles(&self) -> bool {
        matches!(self, JobOrigin::Watch)
    }
}

impl std::fmt::Display for JobOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobOrigin::Scan => write!(f, "scan"),
            JobOrigin::Watch => write!(f, "watch"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub source_path: PathBuf,
    pub origin: JobOrigin,
    pub detected_at: DateTime<Utc>,
}

impl Job {
    pub fn new(source_path: PathBuf, origin: JobOrigin) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_path,
            origin,
            detected_at: Utc::now(),
        }
    }

    pub fn from_scan(source_path: PathBuf) -> Self {
        Self::new(source_path, JobOrigin::Scan)
    }

    pub fn from_watch(source_path: PathBuf) -> Self {
        Self::new(source_path, JobOrigin::Watch)
    }
}

/// Terminal state of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    /// The job stopped in `phase`; the source file is left in place.
    Failed { phase: JobPhase, error: String },
}

#[derive(Debug)]
pub struct JobResult {
    pub job_id: String,
    pub source_path: PathBuf,
    pub origin: JobOrigin,
    pub outcome: JobOutcome,
    pub elapsed: Duration,
}

impl JobResult {
    pub fn success(job: &Job) -> Self {
        Self::finish(job, JobOutcome::Succeeded)
    }

    pub fn failure(job: &Job, phase: JobPhase, error: String) -> Self {
        Self::finish(job, JobOutcome::Failed { phase, error })
    }

    fn finish(job: &Job, outcome: JobOutcome) -> Self {
        let elapsed = (Utc::now() - job.detected_at).to_std().unwrap_or_default();
        Self {
            job_id: job.id.clone(),
            source_path: job.source_path.clone(),
            origin: job.origin,
            outcome,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == JobOutcome::Succeeded
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            JobOutcome::Succeeded => None,
            JobOutcome::Failed { error, .. } => Some(error),
        }
    }
}
