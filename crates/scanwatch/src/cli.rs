//! Command line and environment binding.
//!
//! Every option can be set with a flag or an environment variable; both
//! override values from the optional config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{load_config, Config};
use crate::error::ConfigError;
use crate::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "scanwatch",
    version,
    about = "Watches a scanner output folder, OCRs new documents and uploads them"
)]
pub struct Cli {
    /// Config file (YAML, or JSON with a .json extension).
    #[arg(short, long, env = "SCANWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Upload base URL; may contain {{.User}}.
    #[arg(long, env = "SERVER_URL")]
    pub server_url: Option<String>,

    #[arg(long, env = "SERVER_USER")]
    pub server_user: Option<String>,

    #[arg(long, env = "SERVER_PASS", hide_env_values = true)]
    pub server_pass: Option<String>,

    /// File containing the server password.
    #[arg(long, env = "SERVER_PASS_FILE")]
    pub server_pass_file: Option<String>,

    /// Directory to watch for new scans.
    #[arg(long, env = "WATCHER_PATH")]
    pub watcher_path: Option<PathBuf>,

    /// Seconds to wait before processing a watched file.
    #[arg(long, env = "WATCHER_SETTLE_SECS")]
    pub settle_secs: Option<u64>,

    #[arg(long, env = "WATCHER_QUEUE_SIZE")]
    pub queue_size: Option<usize>,

    /// Maximum number of jobs running at once (unbounded by default).
    #[arg(long, env = "WATCHER_MAX_JOBS")]
    pub max_jobs: Option<usize>,

    /// Comma separated file name globs to skip.
    #[arg(long, env = "WATCHER_IGNORE", value_delimiter = ',')]
    pub ignore: Vec<String>,

    #[arg(long, env = "OCR_EXEC")]
    pub ocr_exec: Option<PathBuf>,

    #[arg(long, env = "OCR_ARGS", allow_hyphen_values = true)]
    pub ocr_args: Option<String>,

    /// Parent directory for per-job temp directories.
    #[arg(long, env = "OCR_TEMP_DIR")]
    pub ocr_temp_dir: Option<PathBuf>,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads the config file (if any) and applies flag/env overrides.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.server_url {
            config.server.url = url.clone();
        }
        if let Some(user) = &self.server_user {
            config.server.user = user.clone();
        }
        if let Some(pass) = &self.server_pass {
            config.server.pass = Some(pass.clone());
        }
        if let Some(pass_file) = &self.server_pass_file {
            config.server.pass_file = Some(pass_file.clone());
        }
        if let Some(path) = &self.watcher_path {
            config.watcher.path = path.clone();
        }
        if let Some(secs) = self.settle_secs {
            config.watcher.settle_secs = secs;
        }
        if let Some(size) = self.queue_size {
            config.watcher.queue_size = size;
        }
        if let Some(max) = self.max_jobs {
            config.watcher.max_concurrent_jobs = Some(max);
        }
        if !self.ignore.is_empty() {
            config.watcher.ignore = self.ignore.clone();
        }
        if let Some(exec) = &self.ocr_exec {
            config.ocr.exec = Some(exec.clone());
        }
        if let Some(args) = &self.ocr_args {
            config.ocr.args = args.clone();
        }
        if let Some(dir) = &self.ocr_temp_dir {
            config.ocr.temp_dir = Some(dir.clone());
        }
    }
}
