use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use log::debug;
use tokio::process::Command;

use crate::error::OcrError;

/// Splits an argument string with shell quoting rules.
///
/// Quotes and backslash escapes are honored; nothing is expanded.
pub fn split_args(args: &str) -> Result<Vec<String>, OcrError> {
    shlex::split(args).ok_or_else(|| OcrError::InvalidArguments(args.to_string()))
}

/// Output of a successful OCR run.
#[derive(Debug)]
pub struct OcrOutput {
    pub status: ExitStatus,
    /// Standard output followed by standard error.
    pub output: String,
}

/// Runs the external OCR executable as
/// `<exec> <args...> <input> <output>`.
#[derive(Clone)]
pub struct OcrRunner {
    inner: Arc<OcrRunnerInner>,
}

struct OcrRunnerInner {
    exec: PathBuf,
    args: String,
}

impl OcrRunner {
    pub fn new(exec: impl Into<PathBuf>, args: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(OcrRunnerInner {
                exec: exec.into(),
                args: args.into(),
            }),
        }
    }

    pub fn exec(&self) -> &Path {
        &self.inner.exec
    }

    /// Builds the full argument vector for one invocation.
    pub fn command_args(&self, input: &Path, output: &Path) -> Result<Vec<OsString>, OcrError> {
        let mut args: Vec<OsString> = split_args(&self.inner.args)?
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_os_string());
        args.push(output.as_os_str().to_os_string());
        Ok(args)
    }

    /// Runs OCR on `input`, writing the result to `output`.
    ///
    /// Exit code 0 is success. The output file is not checked.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<OcrOutput, OcrError> {
        let args = self.command_args(input, output)?;
        debug!("Executing {} {:?}", self.inner.exec.display(), args);

        let result = Command::new(&self.inner.exec)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| OcrError::Spawn {
                exec: self.inner.exec.clone(),
                source: e,
            })?;

        let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&result.stderr));

        if result.status.success() {
            Ok(OcrOutput {
                status: result.status,
                output: combined,
            })
        } else {
            Err(OcrError::Failed {
                status: result.status,
                output: combined,
            })
        }
    }
}
