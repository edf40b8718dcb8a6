//! Filesystem watcher for the scanner output directory.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::WorkerError;
use crate::worker::filter::EntryFilter;

/// Returns the path of a "file is ready" event.
///
/// Only close-after-write and moved-into events qualify; everything else
/// (creates, partial writes, deletes) is ignored.
pub fn ready_path(event: &Event) -> Option<&Path> {
    match event.kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write))
        | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.first().map(PathBuf::as_path)
        }
        _ => None,
    }
}

/// Watches one directory (non-recursive) and delivers ready file paths
/// through a bounded queue.
///
/// Delivery is best-effort: when the queue is full the event is dropped and
/// a warning is logged. The subscription is released when the watcher is
/// dropped.
pub struct FileWatcher {
    directory: PathBuf,
    events: mpsc::Receiver<PathBuf>,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    pub fn start(
        directory: &Path,
        queue_size: usize,
        filter: EntryFilter,
    ) -> Result<Self, WorkerError> {
        let (tx, rx) = mpsc::channel(queue_size.max(1));

        let handler = move |result: notify::Result<Event>| match result {
            Ok(event) => {
                let Some(path) = ready_path(&event) else {
                    return;
                };
                if !filter.accepts(path) {
                    debug!("Ignoring event for {}", path.display());
                    return;
                }
                match tx.try_send(path.to_path_buf()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(path)) => {
                        warn!("Event queue full, dropping event for {}", path.display());
                    }
                    Err(TrySendError::Closed(_)) => {}
                }
            }
            Err(e) => {
                warn!("Watch error: {}", e);
            }
        };

        let mut watcher = notify::recommended_watcher(handler)
            .map_err(|e| WorkerError::WatchError(e.to_string()))?;

        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .map_err(|e| WorkerError::WatchError(e.to_string()))?;

        info!("Watching directory: {}", directory.display());

        Ok(Self {
            directory: directory.to_path_buf(),
            events: rx,
            _watcher: watcher,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Waits for the next ready path. Returns `None` once the watcher backend
    /// has shut down.
    pub async fn recv(&mut self) -> Option<PathBuf> {
        self.events.recv().await
    }
}
