pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod sanitize;
pub mod secrets;
pub mod storage;
pub mod worker;

pub use config::{load_config, resolve_settings, Config, Settings};
pub use error::{ConfigError, OcrError, Result, ScanwatchError, UploadError, WorkerError};
pub use pipeline::{Pipeline, PipelineConfig, ProgressReporter};
pub use processor::OcrRunner;
pub use secrets::{resolve_secret, SecretError};
pub use storage::{UploadClient, Uploader};
pub use worker::{Dispatcher, DispatcherConfig, Job, JobResult};
