use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::TempDir;

/// Prefix of every per-job temp directory.
pub const TEMP_DIR_PREFIX: &str = "scanwatch-";

/// A job's private temp directory.
///
/// Created fresh for every job. [`StagingArea::close`] removes it and logs
/// failures; if the job unwinds or its task is dropped first, the inner
/// `TempDir` removes it on drop.
pub struct StagingArea {
    dir: TempDir,
    output_path: PathBuf,
}

impl StagingArea {
    /// Creates a temp directory under `temp_root` and derives the output
    /// path: same file name as `source`, inside the new directory.
    pub fn create(temp_root: &Path, source: &Path) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(temp_root)?;

        let file_name = source.file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("'{}' has no file name", source.display()),
            )
        })?;
        let output_path = dir.path().join(file_name);

        info!("Temp directory created: {}", dir.path().display());
        Ok(Self { dir, output_path })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Removes the temp directory and everything in it.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        info!("Removing temp directory: {}", path.display());
        if let Err(e) = self.dir.close() {
            warn!("Failed to remove temp directory {}: {}", path.display(), e);
        }
    }
}
