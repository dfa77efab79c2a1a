/// File-count pre-pass used only to size the progress display.
///
/// Shares no state with the classification walk, so skipping it cannot
/// change a `ScanResult`.
use std::path::Path;
use tracing::debug;

/// Count regular files under `root` (symlinks not followed, errors ignored).
pub fn count_files(root: &Path) -> u64 {
    let count = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count() as u64;
    debug!("Estimate pre-pass found {count} files under {}", root.display());
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn counts_nested_files_only() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("a").join("b");
        fs::create_dir_all(&sub).unwrap();
        fs::write(tmp.path().join("one"), b"1").unwrap();
        fs::write(sub.join("two"), b"2").unwrap();
        fs::write(sub.join(".hidden"), b"3").unwrap();
        assert_eq!(count_files(tmp.path()), 3);
    }

    #[test]
    fn empty_directory_counts_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(count_files(tmp.path()), 0);
    }
}
