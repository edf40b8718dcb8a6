use std::sync::Arc;

use log::{error, info, warn};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info_span, Instrument};

use crate::config::Settings;
use crate::error::OcrError;
use crate::processor::OcrRunner;
use crate::sanitize::{self, MAX_LOG_BODY_LENGTH};
use crate::storage::{UploadClient, Uploader};
use crate::worker::job::{Job, JobResult};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::progress::{JobPhase, NoopProgress, ProgressEvent, ProgressReporter};
use super::staging::StagingArea;

/// Processes one file: settle, OCR into a private temp directory, upload,
/// remove the source on success, always remove the temp directory.
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    ocr: OcrRunner,
    uploader: Arc<dyn Uploader>,
    progress: Arc<dyn ProgressReporter>,
}

impl Pipeline {
    /// Builds the OCR runner and upload client from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let uploader = UploadClient::new(
            settings.upload_url.clone(),
            settings.user.clone(),
            SecretString::from(settings.password.expose_secret()),
        );

        Self::new(
            Arc::new(PipelineConfig::from_settings(settings)),
            OcrRunner::new(settings.ocr_exec.clone(), settings.ocr_args.clone()),
            Arc::new(uploader),
        )
    }

    pub fn new(config: Arc<PipelineConfig>, ocr: OcrRunner, uploader: Arc<dyn Uploader>) -> Self {
        Self {
            config,
            ocr,
            uploader,
            progress: Arc::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs a job to a terminal state. Never panics on job errors and never
    /// leaves the job's temp directory behind.
    pub async fn run(&self, job: Job) -> JobResult {
        let span = info_span!("job",
            job_id = %job.id,
            filename = %sanitize::redact_path(&job.source_path),
            origin = %job.origin,
        );
        self.run_job(job).instrument(span).await
    }

    async fn run_job(&self, job: Job) -> JobResult {
        info!("New file detected: {}", job.source_path.display());
        self.phase(&job, JobPhase::Detected);

        if job.origin.settles() {
            self.phase(&job, JobPhase::Settling);
            tokio::time::sleep(self.config.settle_delay).await;
        }

        info!("Processing file: {}", job.source_path.display());
        self.phase(&job, JobPhase::Staging);
        let staging = match StagingArea::create(&self.config.temp_root, &job.source_path) {
            Ok(staging) => staging,
            Err(e) => return self.fail(&job, PipelineError::Staging(e)),
        };
        self.progress.report(ProgressEvent::Staged {
            job_id: job.id.clone(),
            temp_dir: staging.dir().to_path_buf(),
        });

        let result = self.transform_and_upload(&job, &staging).await;

        self.phase(&job, JobPhase::Cleanup);
        let temp_dir = staging.dir().to_path_buf();
        staging.close();
        self.progress.report(ProgressEvent::CleanedUp {
            job_id: job.id.clone(),
            temp_dir,
        });

        match result {
            Ok(()) => {
                self.phase(&job, JobPhase::Succeeded);
                let result = JobResult::success(&job);
                info!(
                    "Job for {} succeeded in {:.1}s",
                    job.source_path.display(),
                    result.elapsed.as_secs_f64()
                );
                result
            }
            Err(e) => self.fail(&job, e),
        }
    }

    async fn transform_and_upload(
        &self,
        job: &Job,
        staging: &StagingArea,
    ) -> Result<(), PipelineError> {
        self.phase(job, JobPhase::Transforming);
        info!(
            "Executing {} on {}",
            self.ocr.exec().display(),
            job.source_path.display()
        );
        match self
            .ocr
            .run(&job.source_path, staging.output_path())
            .instrument(info_span!("transform"))
            .await
        {
            Ok(output) => {
                log_tool_output(&output.output);
                info!("OCR finished successfully.");
            }
            Err(e) => {
                if let OcrError::Failed { output, .. } = &e {
                    log_tool_output(output);
                }
                return Err(e.into());
            }
        }

        self.phase(job, JobPhase::Uploading);
        let response = self
            .uploader
            .upload(staging.output_path())
            .instrument(info_span!("upload"))
            .await?;

        if !response.is_success() {
            let body = response.body.unwrap_or_default();
            warn!(
                "Upload of {} rejected: {}",
                job.source_path.display(),
                sanitize::truncate_for_log(&body, MAX_LOG_BODY_LENGTH)
            );
            return Err(PipelineError::Rejected {
                status: response.status,
                body,
            });
        }

        self.phase(job, JobPhase::RemovingSource);
        info!("Removing input: {}", job.source_path.display());
        if let Err(e) = tokio::fs::remove_file(&job.source_path).await {
            // The document is delivered; a leftover source is only reprocessed later.
            error!(
                "Failed to remove input {}: {}",
                job.source_path.display(),
                e
            );
        }

        Ok(())
    }

    fn phase(&self, job: &Job, phase: JobPhase) {
        self.progress.report(ProgressEvent::Phase {
            job_id: job.id.clone(),
            phase,
        });
    }

    fn fail(&self, job: &Job, error: PipelineError) -> JobResult {
        let phase = error.phase();
        error!(
            "Job for {} failed during {}: {}",
            job.source_path.display(),
            phase,
            error
        );
        self.phase(job, JobPhase::Failed);
        JobResult::failure(job, phase, error.to_string())
    }
}

fn log_tool_output(output: &str) {
    let trimmed = output.trim();
    if !trimmed.is_empty() {
        info!("{}", sanitize::truncate_for_log(trimmed, MAX_LOG_BODY_LENGTH));
    }
}
