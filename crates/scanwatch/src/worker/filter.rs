use std::path::Path;

use glob::Pattern;

use crate::error::ConfigError;

/// Decides which directory entries become jobs.
///
/// Shared by the initial scan and the watcher so both apply the same rules:
/// directories are never processed, and file names matching one of the
/// configured ignore globs are skipped.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    ignore: Vec<Pattern>,
}

impl EntryFilter {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let ignore = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { ignore })
    }

    /// Returns true if the file name matches an ignore pattern.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.ignore.iter().any(|p| p.matches(name))
    }

    /// Returns true if the path should be handed to a job.
    pub fn accepts(&self, path: &Path) -> bool {
        !path.is_dir() && !self.is_ignored(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_filter_accepts_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("scan.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        let filter = EntryFilter::default();
        assert!(filter.accepts(&file));
        assert!(!filter.accepts(temp_dir.path()));
    }

    #[test]
    fn test_ignore_patterns_match_file_name() {
        let filter = EntryFilter::new(&["*.part".to_string(), ".*".to_string()]).unwrap();

        assert!(filter.is_ignored(Path::new("/srv/scans/upload.pdf.part")));
        assert!(filter.is_ignored(Path::new("/srv/scans/.hidden.pdf")));
        assert!(!filter.is_ignored(Path::new("/srv/scans/scan1.pdf")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = EntryFilter::new(&["[".to_string()]);
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
