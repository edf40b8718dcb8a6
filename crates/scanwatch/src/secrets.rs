//! Server password resolution.
//!
//! The password is accepted from two sources, in priority order:
//!
//! 1. **Direct value** - `pass` in the config file, `--server-pass` or `SERVER_PASS`
//! 2. **File reference** - for the Docker secrets pattern (e.g. `SERVER_PASS_FILE=/run/secrets/dav`)
//!
//! An absent password is not an error: some stores accept an empty one.

use secrecy::SecretString;
use std::fs;

/// Error type for secret resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for secret resolution.
pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret from a direct value or a file, direct value first.
///
/// Returns an empty secret when neither source is provided. File contents
/// are trimmed, since secret files usually end with a newline.
///
/// # Examples
///
/// ```ignore
/// use scanwatch::secrets::resolve_secret;
///
/// let secret = resolve_secret(None, Some("/run/secrets/dav_password"))?;
/// ```
pub fn resolve_secret(direct: Option<&str>, file_path: Option<&str>) -> Result<SecretString> {
    if let Some(value) = direct {
        if !value.is_empty() {
            return Ok(SecretString::from(value.to_string()));
        }
    }

    if let Some(path) = file_path {
        if !path.is_empty() {
            let expanded = expand_home(path);
            return match fs::read_to_string(&expanded) {
                Ok(content) => Ok(SecretString::from(content.trim().to_string())),
                Err(e) => Err(SecretError::FileReadError {
                    path: expanded,
                    source: e,
                }),
            };
        }
    }

    Ok(SecretString::from(String::new()))
}

/// Expands `~` to the user's home directory.
///
/// Only `~` and `~/path` are supported, not `~user/path`.
fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            if path == "~" {
                return home.to_string_lossy().into_owned();
            }
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
