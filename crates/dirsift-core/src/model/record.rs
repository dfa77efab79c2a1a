/// Per-file records produced during a scan.
///
/// A [`FileRecord`] lives only long enough to be folded into the aggregate.
/// The side-list entries are what survive into the final `ScanResult`.
use super::Category;
use crate::platform::PermissionFlags;
use serde::Serialize;
use std::path::PathBuf;

/// Everything the walker learned about one regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Logical size in bytes, from `symlink_metadata`.
    pub size: u64,
    pub category: Category,
    pub permissions: PermissionFlags,
}

/// A file whose size strictly exceeds the large-file threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargeFileEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// A file with at least one risky permission bit.
///
/// One warning per file; every tripped flag is carried in `flags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionWarning {
    pub path: PathBuf,
    pub flags: PermissionFlags,
}

/// A recoverable, per-file failure (stat, read, or directory access).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    /// `None` when the walker could not attribute the error to a path.
    pub path: Option<PathBuf>,
    pub message: String,
}

impl FileRecord {
    /// The large-file entry for this record, if it is over `threshold` bytes.
    pub fn large_entry(&self, threshold: u64) -> Option<LargeFileEntry> {
        (self.size > threshold).then(|| LargeFileEntry {
            path: self.path.clone(),
            size: self.size,
        })
    }

    /// The permission warning for this record, if any flag is set.
    pub fn permission_warning(&self) -> Option<PermissionWarning> {
        (!self.permissions.is_empty()).then(|| PermissionWarning {
            path: self.path.clone(),
            flags: self.permissions,
        })
    }
}
