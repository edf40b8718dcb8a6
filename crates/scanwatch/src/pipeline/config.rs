use std::path::PathBuf;
use std::time::Duration;

use crate::config::Settings;

/// The subset of [`Settings`] a file job needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Parent directory for per-job temp directories.
    pub temp_root: PathBuf,
    /// Delay applied to watcher-originated jobs before processing.
    pub settle_delay: Duration,
}

impl PipelineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            temp_root: settings.temp_root.clone(),
            settle_delay: settings.settle_delay,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_root: std::env::temp_dir(),
            settle_delay: Duration::from_secs(5),
        }
    }
}
