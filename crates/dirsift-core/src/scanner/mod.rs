/// Scanner module — orchestrates one classification pass over a tree.
///
/// [`scan`] is the synchronous core: a function of (root, config, options)
/// that always returns a complete `ScanResult` for a valid root, however many
/// files along the way could not be read. [`start_scan`] runs the same pass on
/// a background thread and streams [`ScanProgress`] over a channel.
pub mod estimate;
pub mod progress;
mod walk;

use crate::classify::{CategoryRegistry, DetectionMode, TypeDetector};
use crate::config::{Config, ConfigError};
use crate::model::{gib_to_bytes, ScanResult, GIB};
use progress::ScanProgress;

use crossbeam_channel::{Receiver, Sender};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::info;

pub use estimate::count_files;

/// Fatal errors: the scan never started.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("cannot access {path}: {source}")]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("scanner thread panicked")]
    WorkerPanicked,
}

/// Per-run knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub mode: DetectionMode,
    /// Files strictly larger than this many bytes go on the large-file list.
    pub large_file_threshold: u64,
    /// Run the counting pre-pass before a background scan.
    /// Only [`start_scan`] looks at this; it never affects the result.
    pub estimate: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Fast,
            large_file_threshold: GIB,
            estimate: true,
        }
    }
}

impl ScanOptions {
    /// Set the large-file threshold from a GiB value (`gib * 2^30` bytes).
    pub fn with_threshold_gib(mut self, gib: f64) -> Self {
        self.large_file_threshold = gib_to_bytes(gib);
        self
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Scan `root` and return the aggregated result.
///
/// Fails only if the root is unusable or the rule set is invalid; every
/// per-file problem is recorded inside the returned `ScanResult`.
pub fn scan(root: &Path, config: &Config, options: &ScanOptions) -> Result<ScanResult, ScanError> {
    let registry = CategoryRegistry::from_config(config)?;
    scan_with_registry(root, &registry, options, None, &AtomicBool::new(false))
}

/// Like [`scan`], with a prebuilt registry, optional progress sink, and a
/// cancel flag that is polled during the walk.
pub fn scan_with_registry(
    root: &Path,
    registry: &CategoryRegistry,
    options: &ScanOptions,
    progress: Option<&Sender<ScanProgress>>,
    cancel_flag: &AtomicBool,
) -> Result<ScanResult, ScanError> {
    check_root(root)?;
    info!(
        "Scanning {} ({:?} detection, large-file threshold {} bytes)",
        root.display(),
        options.mode,
        options.large_file_threshold
    );
    let detector = TypeDetector::new(registry, options.mode);
    Ok(walk::walk_tree(root, detector, options, progress, cancel_flag))
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    let meta = fs::metadata(root).map_err(|source| ScanError::RootNotFound {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Maximum number of progress messages that may queue up in the channel.
///
/// If the consumer falls behind, the scanner stalls briefly on `send`
/// rather than consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    thread: thread::JoinHandle<Result<ScanResult, ScanError>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wait for the scan to finish and take its result.
    ///
    /// The handle's own receiver is dropped first so an undrained channel
    /// cannot block the scanner. Clone `progress_rx` beforehand to keep
    /// receiving while waiting.
    pub fn join(self) -> Result<ScanResult, ScanError> {
        let Self {
            progress_rx,
            thread,
            ..
        } = self;
        drop(progress_rx);
        thread.join().map_err(|_| ScanError::WorkerPanicked)?
    }
}

/// Start a scan on a background thread.
///
/// When `options.estimate` is set, an [`ScanProgress::Estimate`] message with
/// the pre-pass count is sent before the walk starts.
pub fn start_scan(
    root: PathBuf,
    config: Config,
    options: ScanOptions,
) -> Result<ScanHandle, ScanError> {
    let registry = CategoryRegistry::from_config(&config)?;
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("dirsift-scanner".into())
        .spawn(move || {
            if options.estimate && root.is_dir() {
                let total_files = estimate::count_files(&root);
                let _ = progress_tx.send(ScanProgress::Estimate { total_files });
            }
            scan_with_registry(&root, &registry, &options, Some(&progress_tx), &cancel_clone)
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        cancel_flag,
        thread,
    })
}
