use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::WorkerError;
use crate::worker::filter::EntryFilter;
use crate::worker::job::Job;

/// One-shot sweep of the watched directory at startup.
pub struct DirectoryScanner {
    input_directory: PathBuf,
    filter: EntryFilter,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P, filter: EntryFilter) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
            filter,
        }
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    /// Returns one scan job per top-level non-directory entry, in file name
    /// order.
    ///
    /// Errors for individual entries are logged and skipped. Failing to read
    /// the directory itself is an error.
    pub fn scan(&self) -> Result<Vec<Job>, WorkerError> {
        let mut jobs = Vec::new();

        for entry in WalkDir::new(&self.input_directory)
            .min_depth(1)
            .max_depth(1) // Only top level; nested files are never processed
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(WorkerError::ScanFailed {
                        path: self.input_directory.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!("Skipping entry in {}: {}", self.input_directory.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if self.filter.is_ignored(path) {
                debug!("Ignoring {}", path.display());
                continue;
            }

            debug!("Found file: {}", path.display());
            jobs.push(Job::from_scan(path.to_path_buf()));
        }

        info!(
            "Scanned {} files in {}",
            jobs.len(),
            self.input_directory.display()
        );
        Ok(jobs)
    }
}
