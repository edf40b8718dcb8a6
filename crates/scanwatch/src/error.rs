use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::secrets::SecretError;

#[derive(Error, Debug)]
pub enum ScanwatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Unable to resolve URL template '{template}': {reason}")]
    UrlTemplate { template: String, reason: String },

    #[error("Invalid upload URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unable to access watcher path '{path}': {reason}")]
    WatchPath { path: PathBuf, reason: String },

    #[error("OCR executable '{name}' not found in PATH")]
    OcrExecutableNotFound { name: String },

    #[error("Invalid OCR arguments: {0}")]
    InvalidOcrArgs(String),

    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to resolve server password: {0}")]
    Secret(#[from] SecretError),
}

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Unable to parse OCR arguments '{0}'")]
    InvalidArguments(String),

    #[error("Failed to execute '{exec}': {source}")]
    Spawn {
        exec: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR exited with {status}")]
    Failed { status: ExitStatus, output: String },
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Path '{0}' has no file name")]
    MissingFileName(PathBuf),

    #[error("Failed to read '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid upload URL: {0}")]
    InvalidUrl(String),

    #[error("Upload request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Watch channel closed unexpectedly")]
    WatchClosed,
}

pub type Result<T> = std::result::Result<T, ScanwatchError>;
