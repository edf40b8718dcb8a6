//! Test harness for isolated pipeline and dispatcher runs.
//!
//! Every harness owns a fresh temp directory with a `watch/` folder for
//! incoming scans and a `tmp/` folder used as the job temp root, so tests
//! can assert that nothing is left behind.

#![allow(dead_code)]

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tempfile::TempDir;

use scanwatch::error::UploadError;
use scanwatch::pipeline::{JobPhase, ProgressEvent};
use scanwatch::storage::UploadResponse;
use scanwatch::worker::EntryFilter;
use scanwatch::{DispatcherConfig, OcrRunner, Pipeline, PipelineConfig, ProgressReporter, Uploader};

pub struct TestHarness {
    temp_dir: TempDir,
    /// Folder the scanner drops files into.
    pub watch_dir: PathBuf,
    /// Parent of per-job temp directories.
    pub temp_root: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let watch_dir = temp_dir.path().join("watch");
        let temp_root = temp_dir.path().join("tmp");
        std::fs::create_dir_all(&watch_dir).expect("Failed to create watch dir");
        std::fs::create_dir_all(&temp_root).expect("Failed to create temp root");

        Self {
            temp_dir,
            watch_dir,
            temp_root,
        }
    }

    /// Writes a file into the watch folder.
    pub fn add_scan(&self, name: &str, content: &str) -> PathBuf {
        let path = self.watch_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write scan");
        path
    }

    /// Writes a file next to the watch folder, ready to be moved in.
    pub fn stage_outside(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn temp_root_is_empty(&self) -> bool {
        std::fs::read_dir(&self.temp_root)
            .expect("Failed to read temp root")
            .next()
            .is_none()
    }

    pub fn pipeline_config(&self, settle_delay: Duration) -> Arc<PipelineConfig> {
        Arc::new(PipelineConfig {
            temp_root: self.temp_root.clone(),
            settle_delay,
        })
    }

    /// Pipeline wired to a recording progress reporter.
    pub fn pipeline(
        &self,
        ocr: OcrRunner,
        uploader: Arc<dyn Uploader>,
        settle_delay: Duration,
    ) -> (Pipeline, Arc<RecordingProgress>) {
        let progress = Arc::new(RecordingProgress::default());
        let pipeline = Pipeline::new(self.pipeline_config(settle_delay), ocr, uploader)
            .with_progress(progress.clone());
        (pipeline, progress)
    }

    pub fn dispatcher_config(
        &self,
        max_concurrent_jobs: Option<NonZeroUsize>,
    ) -> DispatcherConfig {
        DispatcherConfig {
            watch_path: self.watch_dir.clone(),
            queue_size: 64,
            max_concurrent_jobs,
            filter: EntryFilter::default(),
        }
    }
}

/// OCR stand-in that copies the input to the output path.
pub fn copy_ocr() -> OcrRunner {
    OcrRunner::new("cp", "")
}

/// OCR stand-in that prints to stderr and exits non-zero.
pub fn failing_ocr() -> OcrRunner {
    OcrRunner::new("sh", "-c 'echo ocr crashed >&2; exit 3' sh")
}

/// One call to [`RecordingUploader::upload`].
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub path: PathBuf,
    pub content: String,
}

/// Uploader that records every file it is handed and answers with a fixed
/// status.
pub struct RecordingUploader {
    status: StatusCode,
    body: Option<String>,
    delay: Duration,
    uploads: Mutex<Vec<UploadRecord>>,
    started: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl RecordingUploader {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            body: None,
            delay: Duration::ZERO,
            uploads: Mutex::new(Vec::new()),
            started: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Holds every upload open for `delay` so jobs overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Highest number of uploads observed in progress at the same time.
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Uploader for RecordingUploader {
    async fn upload(&self, file: &Path) -> Result<UploadResponse, UploadError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        let content = tokio::fs::read_to_string(file).await;
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        let content = content.map_err(|source| UploadError::ReadFile {
            path: file.to_path_buf(),
            source,
        })?;
        self.uploads.lock().unwrap().push(UploadRecord {
            path: file.to_path_buf(),
            content,
        });

        Ok(UploadResponse {
            status: self.status,
            body: if self.status.is_success() {
                None
            } else {
                self.body.clone()
            },
        })
    }
}

/// Progress reporter that keeps every event in order.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Phases reported for one job, in order.
    pub fn phases(&self, job_id: &str) -> Vec<JobPhase> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Phase { job_id: id, phase } if id == job_id => Some(phase),
                _ => None,
            })
            .collect()
    }

    /// All phases across jobs.
    pub fn all_phases(&self) -> Vec<JobPhase> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Phase { phase, .. } => Some(phase),
                _ => None,
            })
            .collect()
    }

    pub fn staged_dirs(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Staged { temp_dir, .. } => Some(temp_dir),
                _ => None,
            })
            .collect()
    }

    pub fn cleaned_dirs(&self) -> HashSet<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::CleanedUp { temp_dir, .. } => Some(temp_dir),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Polls `condition` until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
