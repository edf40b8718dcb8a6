use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::worker::filter::EntryFilter;

/// Default OCR executable, looked up in `PATH` when none is configured.
pub const DEFAULT_OCR_EXEC: &str = "ocrmypdf";

/// Default ocrmypdf flags.
pub const DEFAULT_OCR_ARGS: &str = "--pdf-renderer sandwich --tesseract-timeout 1800 --rotate-pages -l eng+deu --deskew --clean --skip-text";

/// Raw configuration as read from a config file and command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Upload base URL. May contain `{{.User}}`-style placeholders.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing)]
    pub pass: Option<String>,
    /// File holding the password (Docker secrets).
    #[serde(default)]
    pub pass_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    #[serde(default)]
    pub path: PathBuf,
    /// Delay before a watched file is processed.
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,
    /// Capacity of the event queue between the watcher and the dispatcher.
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
    /// Upper bound on concurrently running jobs. Unbounded when absent.
    #[serde(default)]
    pub max_concurrent_jobs: Option<usize>,
    /// Glob patterns matched against file names; matches are never processed.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_settle_secs() -> u64 {
    5
}

fn default_queue_size() -> usize {
    16
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            settle_secs: default_settle_secs(),
            queue_size: default_queue_size(),
            max_concurrent_jobs: None,
            ignore: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR executable. Resolved from `PATH` as `ocrmypdf` when absent.
    #[serde(default)]
    pub exec: Option<PathBuf>,
    #[serde(default = "default_ocr_args")]
    pub args: String,
    /// Parent directory for per-job temp directories. System temp when absent.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

fn default_ocr_args() -> String {
    DEFAULT_OCR_ARGS.to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            exec: None,
            args: default_ocr_args(),
            temp_dir: None,
        }
    }
}

/// Validated, immutable runtime settings.
///
/// Built once at startup by [`crate::config::resolve_settings`] and handed to
/// every component that needs it.
#[derive(Debug)]
pub struct Settings {
    /// Upload base URL with template placeholders resolved.
    pub upload_url: String,
    pub user: String,
    pub password: SecretString,
    pub watch_path: PathBuf,
    pub settle_delay: Duration,
    pub queue_size: usize,
    pub max_concurrent_jobs: Option<NonZeroUsize>,
    pub filter: EntryFilter,
    pub ocr_exec: PathBuf,
    pub ocr_args: String,
    pub temp_root: PathBuf,
}
