/// Scanner module — orchestrates directory-tree scanning.
///
/// [`scan`] runs the iterative walk synchronously with caller-supplied
/// callbacks. [`start_scan`] wraps it in a dedicated background thread that
/// reports through a bounded [`ScanProgress`] channel, and [`ScanSession`]
/// enforces the one-active-scan-at-a-time rule on top of that.
pub mod progress;
pub mod walk;

pub use progress::ScanProgress;
pub use walk::{ScanOutcome, ScanStats};

use crate::model::DirectoryRecord;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use thiserror::Error;
use tracing::info;

/// Maximum number of progress messages that may queue up in the channel.
///
/// Informational events beyond this are dropped rather than blocking the
/// scan thread, so a slow consumer costs visibility, never correctness.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Cooperative cancellation signal, checked once per traversal step.
///
/// Clones share the same flag; cancelling any clone cancels the scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the scan to stop at the next directory boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Caller-misuse errors, surfaced synchronously before any background work.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("scan root is not a directory: {0}")]
    RootNotADirectory(PathBuf),

    #[error("cannot read scan root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Check that `root` exists and is a directory.
fn validate_root(root: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(root).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ScanError::RootNotFound(root.to_path_buf())
        } else {
            ScanError::RootUnreadable {
                path: root.to_path_buf(),
                source: err,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::RootNotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Scan `root` synchronously on the calling thread.
///
/// `on_partial` receives each directory's finished record in strict
/// post-order; `on_status` receives each directory path in traversal order.
/// Returns [`ScanOutcome::Aborted`] if `cancel` fires before the walk ends —
/// never a partially aggregated tree.
pub fn scan<P, S>(
    root: &Path,
    cancel: &CancelToken,
    on_partial: P,
    on_status: S,
) -> Result<ScanOutcome, ScanError>
where
    P: FnMut(&DirectoryRecord),
    S: FnMut(&Path),
{
    validate_root(root)?;
    Ok(walk::walk_tree(root, cancel, on_partial, on_status))
}

/// Handle to a running or completed scan. Allows cancellation and
/// receiving progress updates.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    cancel: CancelToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Block until the scan thread has terminated.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Start a new scan on a dedicated background thread.
///
/// The root is validated here, synchronously, so caller mistakes surface
/// before any thread is spawned. The walk itself blocks only on filesystem
/// enumeration; results flow back through the handle's progress channel,
/// ending in exactly one `Complete` or `Cancelled` event.
pub fn start_scan(root: PathBuf) -> Result<ScanHandle, ScanError> {
    validate_root(&root)?;

    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = CancelToken::new();
    let cancel_clone = cancel.clone();

    let thread = thread::Builder::new()
        .name("treescope-scanner".into())
        .spawn(move || {
            info!("starting scan of {}", root.display());

            let status_tx = progress_tx.clone();
            let subtree_tx = progress_tx.clone();

            let outcome = walk::walk_tree(
                &root,
                &cancel_clone,
                |record| {
                    let _ = subtree_tx.try_send(ScanProgress::Subtree {
                        path: record.path.clone(),
                        size: record.size,
                        file_count: record.file_count,
                        folder_count: record.folder_count,
                    });
                },
                |path| {
                    let _ = status_tx.try_send(ScanProgress::Status {
                        message: format!("Scanning: {}", path.display()),
                    });
                },
            );

            match outcome {
                ScanOutcome::Completed { record, stats } => {
                    info!(
                        "scan of {} complete: {} files, {} folders, {} bytes in {:?}",
                        root.display(),
                        record.file_count,
                        record.folder_count,
                        record.size,
                        stats.duration
                    );
                    let _ = progress_tx.send(ScanProgress::Complete {
                        record,
                        duration: stats.duration,
                        error_count: stats.error_count,
                    });
                }
                ScanOutcome::Aborted => {
                    info!("scan of {} cancelled", root.display());
                    let _ = progress_tx.send(ScanProgress::Cancelled);
                }
            }
        })
        .expect("failed to spawn scanner thread");

    Ok(ScanHandle {
        progress_rx,
        cancel,
        thread: Some(thread),
    })
}

/// The one-active-scan-per-session rule, made explicit.
///
/// The current scan's handle lives in a single slot; starting a new scan
/// first cancels and joins whatever occupies it, so two scans can never
/// race. The session never reads the progress channel itself — the
/// receiver returned by [`ScanSession::start`] is the consumer's.
#[derive(Default)]
pub struct ScanSession {
    current: Mutex<Option<ScanHandle>>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and await any previous scan, then start a new one.
    pub fn start(&self, root: PathBuf) -> Result<Receiver<ScanProgress>, ScanError> {
        let mut slot = self.current.lock();
        if let Some(previous) = slot.take() {
            previous.cancel();
            previous.join();
        }

        let handle = start_scan(root)?;
        let progress_rx = handle.progress_rx.clone();
        *slot = Some(handle);
        Ok(progress_rx)
    }

    /// Request cancellation of the current scan, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.current.lock().as_ref() {
            handle.cancel();
        }
    }

    /// Cancel the current scan and block until its thread has exited.
    pub fn shutdown(&self) {
        if let Some(handle) = self.current.lock().take() {
            handle.cancel();
            handle.join();
        }
    }
}
