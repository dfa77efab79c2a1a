/// Report writers — the large-file list, permission warnings, and the CSV summary.
use super::ReportView;
use crate::model::{format_size, LargeFileEntry, PermissionWarning};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

fn write_header(out: &mut impl Write, title: &str, root: &Path) -> io::Result<()> {
    writeln!(out, "# {title} for {}", root.display())?;
    writeln!(
        out,
        "# generated {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S %z")
    )
}

/// One line per file: `<path>\t<human size> (<bytes> bytes)`.
pub fn write_large_files(path: &Path, root: &Path, entries: &[LargeFileEntry]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, "Large files", root)?;
    for entry in entries {
        writeln!(
            out,
            "{}\t{} ({} bytes)",
            entry.path.display(),
            format_size(entry.size),
            entry.size
        )?;
    }
    out.flush()
}

/// One line per file: `<path>\t<flag, flag, ...>`.
pub fn write_permission_warnings(
    path: &Path,
    root: &Path,
    warnings: &[PermissionWarning],
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, "Permission warnings", root)?;
    for warning in warnings {
        writeln!(out, "{}\t{}", warning.path.display(), warning.flags)?;
    }
    out.flush()
}

/// The summary table as CSV: `category,files,size,bytes`.
pub fn write_summary_csv(path: &Path, view: &ReportView<'_>) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["category", "files", "size", "bytes"])?;
    for row in view.rows() {
        let files = row.files.to_string();
        let bytes = row.bytes.map(|b| b.to_string()).unwrap_or_default();
        writer.write_record([
            row.label.as_str(),
            files.as_str(),
            row.size.as_str(),
            bytes.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, FileRecord, ScanResult};
    use crate::platform::PermissionFlags;
    use crate::report::assemble;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn data_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|l| !l.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn large_files_one_line_each() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("big.txt");
        let entries = vec![
            LargeFileEntry { path: PathBuf::from("/r/a.iso"), size: 2048 },
            LargeFileEntry { path: PathBuf::from("/r/b.iso"), size: 10 },
        ];
        write_large_files(&out, Path::new("/r"), &entries).unwrap();

        let lines = data_lines(&out);
        assert_eq!(lines, ["/r/a.iso\t2.0 KiB (2048 bytes)", "/r/b.iso\t10 B (10 bytes)"]);
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("# Large files for /r\n# generated "));
    }

    #[test]
    fn permission_warnings_list_all_flags() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("perm.txt");
        let warnings = vec![PermissionWarning {
            path: PathBuf::from("/r/tool"),
            flags: PermissionFlags::SUID | PermissionFlags::SGID,
        }];
        write_permission_warnings(&out, Path::new("/r"), &warnings).unwrap();
        assert_eq!(data_lines(&out), ["/r/tool\tsetuid, setgid"]);
    }

    #[test]
    fn empty_lists_write_only_header() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("perm.txt");
        write_permission_warnings(&out, Path::new("/r"), &[]).unwrap();
        assert!(data_lines(&out).is_empty());
    }

    #[test]
    fn summary_csv_has_every_row() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("summary.csv");
        let mut result = ScanResult::default();
        result.record(
            FileRecord {
                path: PathBuf::from("/r/x.png"),
                size: 9333,
                category: Category::Image,
                permissions: PermissionFlags::empty(),
            },
            u64::MAX,
        );
        write_summary_csv(&out, &assemble(&result)).unwrap();

        let lines = data_lines(&out);
        assert_eq!(lines[0], "category,files,size,bytes");
        assert_eq!(lines[1], "Image,1,9.1 KiB,9333");
        assert_eq!(lines.len(), 1 + Category::COUNT + 2);
        assert_eq!(lines[Category::COUNT + 1], "Errors,0,n/a,");
        assert_eq!(lines[Category::COUNT + 2], "Totals,1,9.1 KiB,9333");
    }
}
