use thiserror::Error;

use super::progress::JobPhase;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to create temp directory: {0}")]
    Staging(#[source] std::io::Error),

    #[error("OCR failed: {0}")]
    Ocr(#[from] crate::error::OcrError),

    #[error("Upload failed: {0}")]
    Upload(#[from] crate::error::UploadError),

    #[error("Upload rejected with {status}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl PipelineError {
    /// The phase in which the job stopped.
    pub fn phase(&self) -> JobPhase {
        match self {
            PipelineError::Staging(_) => JobPhase::Staging,
            PipelineError::Ocr(_) => JobPhase::Transforming,
            PipelineError::Upload(_) | PipelineError::Rejected { .. } => JobPhase::Uploading,
        }
    }
}
