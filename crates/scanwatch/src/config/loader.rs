use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use secrecy::ExposeSecret;

use crate::config::schema::{Config, Settings, DEFAULT_OCR_EXEC};
use crate::config::template::render_url_template;
use crate::error::ConfigError;
use crate::processor::ocr::split_args;
use crate::sanitize;
use crate::secrets::resolve_secret;
use crate::worker::filter::EntryFilter;

/// Config file formats understood by [`load_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.json` files are JSON, everything else is treated as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content, ConfigFormat::from_path(path))
}

pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let config = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(config)
}

/// Validates a raw [`Config`] and turns it into runtime [`Settings`].
///
/// Every check here is fatal at startup: the process never runs with a
/// partially valid configuration.
pub fn resolve_settings(config: Config) -> Result<Settings, ConfigError> {
    if config.server.url.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "server URL is not set".to_string(),
        });
    }

    let password = resolve_secret(
        config.server.pass.as_deref(),
        config.server.pass_file.as_deref(),
    )?;

    let upload_url = render_url_template(&config.server, password.expose_secret())?;
    validate_upload_url(&upload_url)?;
    info!("Upload-URL: {}", sanitize::redact_url(&upload_url));

    let watch_path = validate_watch_path(&config.watcher.path)?;

    if config.watcher.queue_size == 0 {
        return Err(ConfigError::Validation {
            message: "watcher queue size must be greater than zero".to_string(),
        });
    }
    let max_concurrent_jobs = config
        .watcher
        .max_concurrent_jobs
        .map(|max| {
            NonZeroUsize::new(max).ok_or_else(|| ConfigError::Validation {
                message: "max concurrent jobs must be greater than zero".to_string(),
            })
        })
        .transpose()?;

    let filter = EntryFilter::new(&config.watcher.ignore)?;

    let ocr_exec = match config.ocr.exec {
        Some(exec) if !exec.as_os_str().is_empty() => exec,
        _ => which::which(DEFAULT_OCR_EXEC).map_err(|_| ConfigError::OcrExecutableNotFound {
            name: DEFAULT_OCR_EXEC.to_string(),
        })?,
    };

    split_args(&config.ocr.args).map_err(|e| ConfigError::InvalidOcrArgs(e.to_string()))?;

    let temp_root = config.ocr.temp_dir.unwrap_or_else(std::env::temp_dir);

    Ok(Settings {
        upload_url,
        user: config.server.user,
        password,
        watch_path,
        settle_delay: Duration::from_secs(config.watcher.settle_secs),
        queue_size: config.watcher.queue_size,
        max_concurrent_jobs,
        filter,
        ocr_exec,
        ocr_args: config.ocr.args,
        temp_root,
    })
}

fn validate_upload_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: sanitize::redact_url(url),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: sanitize::redact_url(url),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}

fn validate_watch_path(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::WatchPath {
            path: path.to_path_buf(),
            reason: "path is not set".to_string(),
        });
    }

    let metadata = std::fs::metadata(path).map_err(|e| ConfigError::WatchPath {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(ConfigError::WatchPath {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(path.to_path_buf())
}
