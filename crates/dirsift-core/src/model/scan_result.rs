/// Running aggregate and the terminal result of a scan.
use super::record::{FileError, FileRecord, LargeFileEntry, PermissionWarning};
use super::Category;
use serde::Serialize;
use std::time::Duration;

/// File count and byte total for one category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub file_count: u64,
    pub total_size: u64,
}

/// Per-category totals, one fixed slot per [`Category`].
///
/// Only ever incremented — there is no way to remove a file once recorded.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    slots: [CategoryStats; Category::COUNT],
}

impl AggregateStats {
    /// Fold one file into its category.
    #[inline]
    pub fn add(&mut self, category: Category, size: u64) {
        let slot = &mut self.slots[category.idx()];
        slot.file_count += 1;
        slot.total_size = slot.total_size.saturating_add(size);
    }

    pub fn get(&self, category: Category) -> CategoryStats {
        self.slots[category.idx()]
    }

    /// Iterate every category in display order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, CategoryStats)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Sum across all categories.
    pub fn total(&self) -> CategoryStats {
        self.slots.iter().fold(CategoryStats::default(), |acc, s| CategoryStats {
            file_count: acc.file_count + s.file_count,
            total_size: acc.total_size.saturating_add(s.total_size),
        })
    }
}

/// The complete output of one traversal.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanResult {
    pub stats: AggregateStats,
    /// Sorted by path once the scan finishes.
    pub large_files: Vec<LargeFileEntry>,
    /// Sorted by path once the scan finishes.
    pub permission_warnings: Vec<PermissionWarning>,
    /// Recoverable per-file errors, in the order they were hit.
    pub errors: Vec<FileError>,
    pub duration: Duration,
    /// `true` if the walk stopped early on request.
    pub cancelled: bool,
}

impl ScanResult {
    /// Fold a classified file into the aggregate and side lists.
    pub fn record(&mut self, record: FileRecord, large_threshold: u64) {
        self.stats.add(record.category, record.size);
        if let Some(entry) = record.large_entry(large_threshold) {
            self.large_files.push(entry);
        }
        if let Some(warning) = record.permission_warning() {
            self.permission_warnings.push(warning);
        }
    }

    pub fn record_error(&mut self, error: FileError) {
        self.errors.push(error);
    }

    pub fn error_count(&self) -> u64 {
        self.errors.len() as u64
    }

    /// Number of files folded into the aggregate.
    pub fn files_counted(&self) -> u64 {
        self.stats.total().file_count
    }

    /// Sort the side lists so output does not depend on walk order.
    pub(crate) fn finish(&mut self, duration: Duration, cancelled: bool) {
        self.large_files.sort_by(|a, b| a.path.cmp(&b.path));
        self.permission_warnings.sort_by(|a, b| a.path.cmp(&b.path));
        self.duration = duration;
        self.cancelled = cancelled;
    }
}
