use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::watch;

use crate::config::Settings;
use crate::error::WorkerError;
use crate::pipeline::Pipeline;
use crate::worker::filter::EntryFilter;
use crate::worker::job::{Job, JobResult};
use crate::worker::pool::{log_joined, JobLauncher};
use crate::worker::scanner::DirectoryScanner;
use crate::worker::watcher::FileWatcher;

/// Settings the dispatcher needs to scan and watch.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub watch_path: PathBuf,
    pub queue_size: usize,
    pub max_concurrent_jobs: Option<NonZeroUsize>,
    pub filter: EntryFilter,
}

impl DispatcherConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            watch_path: settings.watch_path.clone(),
            queue_size: settings.queue_size,
            max_concurrent_jobs: settings.max_concurrent_jobs,
            filter: settings.filter.clone(),
        }
    }
}

/// The main loop: one sequential pass over existing files, then one
/// concurrent job per watch event until shutdown.
pub struct Dispatcher {
    config: DispatcherConfig,
    pipeline: Arc<Pipeline>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig, pipeline: Arc<Pipeline>) -> Self {
        Self { config, pipeline }
    }

    /// Runs until `shutdown` turns true (or its sender is dropped).
    ///
    /// The watch subscription is set up before the initial scan, so files
    /// arriving during the scan are queued rather than missed. On shutdown the
    /// subscription is released and in-flight jobs are awaited.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), WorkerError> {
        let mut watcher = FileWatcher::start(
            &self.config.watch_path,
            self.config.queue_size,
            self.config.filter.clone(),
        )?;

        info!("Processing old files first");
        self.run_initial_scan(&shutdown).await?;

        let mut launcher = JobLauncher::new(
            Arc::clone(&self.pipeline),
            self.config.max_concurrent_jobs,
        );
        info!("Watching {}", watcher.directory().display());

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                event = watcher.recv() => match event {
                    Some(path) => launcher.launch(Job::from_watch(path)),
                    None => return Err(WorkerError::WatchClosed),
                },
                Some(joined) = launcher.join_next(), if launcher.in_flight() > 0 => {
                    log_joined(joined);
                }
            }
        }

        drop(watcher);
        let in_flight = launcher.in_flight();
        if in_flight > 0 {
            info!("Waiting for {} running jobs to finish", in_flight);
        }
        launcher.drain().await;
        info!("Dispatcher stopped");
        Ok(())
    }

    /// Processes every file already present, one after another, without a
    /// settle delay. Stops early between files if shutdown is requested.
    pub async fn run_initial_scan(
        &self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<Vec<JobResult>, WorkerError> {
        let scanner = DirectoryScanner::new(&self.config.watch_path, self.config.filter.clone());
        let jobs = scanner.scan()?;

        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            if *shutdown.borrow() {
                warn!("Shutdown requested, skipping remaining scanned files");
                break;
            }
            results.push(self.pipeline.run(job).await);
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            "Initial scan finished: {} processed, {} failed",
            results.len(),
            failed
        );
        Ok(results)
    }
}
