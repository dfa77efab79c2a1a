/// Report assembly — shapes a finished `ScanResult` for display or export.
///
/// No classification happens here. The large-file and permission lists are
/// passed through as they are; only the summary rows are formatted.
pub mod sink;

use crate::model::{format_size, LargeFileEntry, PermissionWarning, ScanResult};
use serde::Serialize;

pub use sink::{write_large_files, write_permission_warnings, write_summary_csv};

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub files: u64,
    /// Human-readable size, or `n/a` for rows without one.
    pub size: String,
    /// Exact byte count; `None` for the error row.
    pub bytes: Option<u64>,
}

impl SummaryRow {
    fn sized(label: &str, files: u64, bytes: u64) -> Self {
        Self {
            label: label.to_string(),
            files,
            size: format_size(bytes),
            bytes: Some(bytes),
        }
    }
}

/// Everything a sink needs to render or persist a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView<'a> {
    /// One row per category in display order, including empty ones.
    pub categories: Vec<SummaryRow>,
    pub errors: SummaryRow,
    pub totals: SummaryRow,
    pub large_files: &'a [LargeFileEntry],
    pub permission_warnings: &'a [PermissionWarning],
    pub cancelled: bool,
}

impl ReportView<'_> {
    /// Category rows, then the error row, then totals.
    pub fn rows(&self) -> impl Iterator<Item = &SummaryRow> {
        self.categories
            .iter()
            .chain([&self.errors, &self.totals])
    }
}

/// Build the report view for `result`.
pub fn assemble(result: &ScanResult) -> ReportView<'_> {
    let categories = result
        .stats
        .iter()
        .map(|(category, stats)| {
            SummaryRow::sized(category.label(), stats.file_count, stats.total_size)
        })
        .collect();
    let total = result.stats.total();

    ReportView {
        categories,
        errors: SummaryRow {
            label: "Errors".to_string(),
            files: result.error_count(),
            size: "n/a".to_string(),
            bytes: None,
        },
        totals: SummaryRow::sized("Totals", total.file_count, total.total_size),
        large_files: &result.large_files,
        permission_warnings: &result.permission_warnings,
        cancelled: result.cancelled,
    }
}
