use std::num::NonZeroUsize;
use std::sync::Arc;

use log::{debug, error};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use crate::pipeline::Pipeline;
use crate::worker::job::{Job, JobResult};

/// Launches file jobs as independent tasks.
///
/// Launching never waits: with a concurrency limit, each task waits for its
/// own permit, so the caller can keep draining the watch queue.
pub struct JobLauncher {
    pipeline: Arc<Pipeline>,
    limiter: Option<Arc<Semaphore>>,
    tasks: JoinSet<JobResult>,
}

impl JobLauncher {
    /// Creates a launcher. `max_concurrent_jobs = None` means unbounded.
    pub fn new(pipeline: Arc<Pipeline>, max_concurrent_jobs: Option<NonZeroUsize>) -> Self {
        Self {
            pipeline,
            limiter: max_concurrent_jobs.map(|n| Arc::new(Semaphore::new(n.get()))),
            tasks: JoinSet::new(),
        }
    }

    pub fn launch(&mut self, job: Job) {
        let pipeline = Arc::clone(&self.pipeline);
        let limiter = self.limiter.clone();

        debug!("Launching job {} for {}", job.id, job.source_path.display());
        self.tasks.spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            pipeline.run(job).await
        });
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for the next job to finish. Returns `None` when none are running.
    pub async fn join_next(&mut self) -> Option<Result<JobResult, JoinError>> {
        self.tasks.join_next().await
    }

    /// Waits for every running job to reach a terminal state.
    pub async fn drain(&mut self) -> Vec<JobResult> {
        let mut results = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            if let Some(result) = log_joined(joined) {
                results.push(result);
            }
        }
        results
    }
}

/// Unwraps a finished task, logging panics.
pub fn log_joined(joined: Result<JobResult, JoinError>) -> Option<JobResult> {
    match joined {
        Ok(result) => {
            debug!("Job {} finished: {:?}", result.job_id, result.outcome);
            Some(result)
        }
        Err(e) => {
            error!("Job task panicked: {}", e);
            None
        }
    }
}
