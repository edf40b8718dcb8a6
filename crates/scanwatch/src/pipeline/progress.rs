use std::path::PathBuf;

/// Steps of a file job, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobPhase {
    Detected,
    Settling,
    Staging,
    Transforming,
    Uploading,
    RemovingSource,
    Cleanup,
    Succeeded,
    Failed,
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobPhase::Detected => write!(f, "Detected"),
            JobPhase::Settling => write!(f, "Settling"),
            JobPhase::Staging => write!(f, "Staging"),
            JobPhase::Transforming => write!(f, "Transforming"),
            JobPhase::Uploading => write!(f, "Uploading"),
            JobPhase::RemovingSource => write!(f, "Removing source"),
            JobPhase::Cleanup => write!(f, "Cleanup"),
            JobPhase::Succeeded => write!(f, "Succeeded"),
            JobPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// Events emitted by the pipeline while a job runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Phase { job_id: String, phase: JobPhase },
    /// The job's private temp directory was created.
    Staged { job_id: String, temp_dir: PathBuf },
    /// The temp directory was removed (or removal was attempted).
    CleanedUp { job_id: String, temp_dir: PathBuf },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Reporter that discards every event.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}
