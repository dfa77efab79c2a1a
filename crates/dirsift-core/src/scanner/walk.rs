/// Parallel tree walk with per-file classification and aggregation.
///
/// Directory enumeration runs on a `jwalk` rayon pool. Regular files are
/// gathered into batches; each batch is stat'ed, classified, and
/// permission-checked in parallel with rayon, then folded into the
/// `ScanResult` on this thread. The aggregate therefore has exactly one
/// mutator, and a batch's results are folded in discovery order.
///
/// Symlinks are never followed, so the walk cannot cycle.
use super::progress::ScanProgress;
use super::ScanOptions;
use crate::classify::TypeDetector;
use crate::model::{FileError, FileRecord, ScanResult};
use crate::platform::{check_permissions, mode_bits};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::debug;

/// Files collected before a parallel inspection pass.
///
/// Each flush also emits one `Update`, so this doubles as the progress cadence.
const BATCH_SIZE: usize = 1_024;

/// How often (in walk entries) the cancel flag is polled.
const CANCEL_CHECK_INTERVAL: u64 = 1_000;

/// Mutable state threaded through one walk.
struct Walk<'a> {
    detector: TypeDetector<'a>,
    threshold: u64,
    progress: Option<&'a Sender<ScanProgress>>,
    result: ScanResult,
}

impl Walk<'_> {
    fn send(&self, msg: ScanProgress) {
        if let Some(tx) = self.progress {
            let _ = tx.send(msg);
        }
    }

    fn fail(&mut self, error: FileError) {
        debug!(
            "Skipping {}: {}",
            error
                .path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            error.message
        );
        self.send(ScanProgress::Error {
            path: error
                .path
                .as_deref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            message: error.message.clone(),
        });
        self.result.record_error(error);
    }

    /// Inspect `batch` in parallel and fold the outcomes in order.
    fn flush(&mut self, batch: &mut Vec<PathBuf>) {
        if batch.is_empty() {
            return;
        }
        let paths = std::mem::replace(batch, Vec::with_capacity(BATCH_SIZE));
        let detector = self.detector;
        let outcomes: Vec<Result<FileRecord, FileError>> = paths
            .into_par_iter()
            .map(|path| inspect(&detector, path))
            .collect();

        let mut last_path = String::new();
        for outcome in outcomes {
            match outcome {
                Ok(record) => {
                    last_path = record.path.to_string_lossy().into_owned();
                    self.result.record(record, self.threshold);
                }
                Err(error) => self.fail(error),
            }
        }

        let totals = self.result.stats.total();
        self.send(ScanProgress::Update {
            files_scanned: totals.file_count,
            total_size: totals.total_size,
            error_count: self.result.error_count(),
            current_path: last_path,
        });
    }
}

/// Stat, classify, and permission-check one file.
fn inspect(detector: &TypeDetector<'_>, path: PathBuf) -> Result<FileRecord, FileError> {
    let meta = match fs::symlink_metadata(&path) {
        Ok(meta) => meta,
        Err(err) => return Err(file_error(path, &err)),
    };
    let category = match detector.try_classify(&path) {
        Ok(category) => category,
        Err(err) => return Err(file_error(path, &err)),
    };
    Ok(FileRecord {
        size: meta.len(),
        category,
        permissions: check_permissions(mode_bits(&meta)),
        path,
    })
}

fn file_error(path: PathBuf, err: &dyn std::fmt::Display) -> FileError {
    FileError {
        path: Some(path),
        message: err.to_string(),
    }
}

/// Walk `root` and build the result. `root` must already be a directory.
pub(crate) fn walk_tree(
    root: &Path,
    detector: TypeDetector<'_>,
    options: &ScanOptions,
    progress: Option<&Sender<ScanProgress>>,
    cancel_flag: &AtomicBool,
) -> ScanResult {
    let start = Instant::now();
    let mut walk = Walk {
        detector,
        threshold: options.large_file_threshold,
        progress,
        result: ScanResult::default(),
    };
    let mut batch: Vec<PathBuf> = Vec::with_capacity(BATCH_SIZE);
    let mut entries_seen: u64 = 0;
    let mut cancelled = cancel_flag.load(Ordering::Relaxed);

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    for entry_result in walker {
        if cancelled {
            break;
        }
        entries_seen += 1;
        if entries_seen.is_multiple_of(CANCEL_CHECK_INTERVAL) && cancel_flag.load(Ordering::Relaxed) {
            cancelled = true;
            break;
        }

        let mut entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                walk.fail(FileError {
                    path: err.path().map(Path::to_path_buf),
                    message: err.to_string(),
                });
                continue;
            }
        };

        // An unlistable directory still arrives as `Ok`; the listing failure
        // rides along on the entry.
        if let Some(err) = entry.read_children_error.take() {
            walk.fail(FileError {
                path: Some(entry.path()),
                message: err.to_string(),
            });
        }

        // Directories, symlinks, sockets, fifos and devices are not counted.
        if !entry.file_type().is_file() {
            continue;
        }

        batch.push(entry.path());
        if batch.len() >= BATCH_SIZE {
            walk.flush(&mut batch);
            if cancel_flag.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
        }
    }

    // Files already discovered are folded in even when cancelled.
    walk.flush(&mut batch);

    let duration = start.elapsed();
    let mut result = walk.result;
    result.finish(duration, cancelled);
    debug!(
        "Walk of {} finished: {} files, {} errors in {duration:?}{}",
        root.display(),
        result.files_counted(),
        result.error_count(),
        if cancelled { " (cancelled)" } else { "" }
    );

    if let Some(tx) = progress {
        let _ = tx.send(if cancelled {
            ScanProgress::Cancelled
        } else {
            ScanProgress::Complete {
                duration,
                files_scanned: result.files_counted(),
                error_count: result.error_count(),
            }
        });
    }
    result
}
