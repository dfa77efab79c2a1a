/// Scan progress reporting — lightweight messages sent from the scan
/// thread to whoever renders progress, via a crossbeam channel.
///
/// Nothing in here feeds back into the result; dropping every message
/// produces the same `ScanResult`.
use std::time::Duration;

/// Progress updates sent from the scan thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanProgress {
    /// Result of the optional counting pre-pass, sent before the real walk.
    Estimate { total_files: u64 },
    /// Periodic update with running totals.
    Update {
        files_scanned: u64,
        total_size: u64,
        error_count: u64,
        current_path: String,
    },
    /// A non-fatal error (e.g. permission denied on one file).
    Error { path: String, message: String },
    /// The walk finished and the result is final.
    Complete {
        duration: Duration,
        files_scanned: u64,
        error_count: u64,
    },
    /// The walk stopped early on request; the result is partial.
    Cancelled,
}

impl ScanProgress {
    /// `true` for the last message a scan sends.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Cancelled)
    }
}
