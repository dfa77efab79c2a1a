/// Data model — categories, per-file records, and the scan aggregate.
pub mod category;
pub mod record;
pub mod scan_result;
pub mod size;

pub use category::{Category, UnknownCategory};
pub use record::{FileError, FileRecord, LargeFileEntry, PermissionWarning};
pub use scan_result::{AggregateStats, CategoryStats, ScanResult};
pub use size::{format_count, format_size, gib_to_bytes, GIB};
