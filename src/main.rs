//! dirsift — classify a directory tree by file type and flag risky files.
//!
//! Thin binary entry point. All logic lives in the `dirsift-core` crate.

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;
use dirsift_core::classify::DetectionMode;
use dirsift_core::config::DEFAULT_CONFIG_PATH;
use dirsift_core::model::{format_count, ScanResult};
use dirsift_core::report::{self, ReportView};
use dirsift_core::scanner::progress::ScanProgress;
use dirsift_core::scanner::{start_scan, ScanOptions};
use dirsift_core::Config;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "dirsift", version, about = "Summarise a directory by file type, size, and permissions")]
struct Cli {
    /// Path to the directory to analyse
    dir_path: PathBuf,

    /// File size in GiB above which a file is listed as large
    #[arg(long, default_value_t = 1.0)]
    size_threshold: f64,

    /// Detect types from file content instead of extensions (slower)
    #[arg(long)]
    thorough: bool,

    /// Skip the file-count pre-pass used for progress estimation
    #[arg(long)]
    skip_estimate: bool,

    /// Configuration file; created with defaults if missing
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Do not write the large-file, permission, and summary files
    #[arg(long)]
    no_side_files: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if !cli.size_threshold.is_finite() || cli.size_threshold < 0.0 {
        bail!("--size-threshold must be a non-negative number of GiB");
    }

    let config = Config::load_or_create(&cli.config)?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", cli.config.display()))?;

    let mode = if cli.thorough {
        DetectionMode::Thorough
    } else {
        DetectionMode::Fast
    };
    let options = ScanOptions {
        mode,
        estimate: !cli.skip_estimate,
        ..ScanOptions::default()
    }
    .with_threshold_gib(cli.size_threshold);

    info!(dir = %cli.dir_path.display(), ?mode, "starting analysis");

    let handle = start_scan(cli.dir_path.clone(), config.clone(), options)?;
    let progress_rx = handle.progress_rx.clone();
    let renderer = thread::Builder::new()
        .name("dirsift-progress".into())
        .spawn(move || render_progress(progress_rx))
        .context("failed to spawn progress thread")?;

    let result = handle.join();
    let _ = renderer.join();
    let result = result?;

    let view = report::assemble(&result);
    print_summary(&view);

    if !cli.no_side_files {
        write_side_files(&config, &cli.dir_path, &result, &view)?;
    }
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Single status line on stderr until the scan ends.
fn render_progress(rx: Receiver<ScanProgress>) {
    let mut expected: Option<u64> = None;
    let mut stderr = std::io::stderr();
    for msg in rx.iter() {
        match msg {
            ScanProgress::Estimate { total_files } => {
                expected = Some(total_files);
                let _ = writeln!(stderr, "Preliminary file count: {}", format_count(total_files));
            }
            ScanProgress::Update {
                files_scanned,
                error_count,
                current_path,
                ..
            } => {
                let done = files_scanned + error_count;
                let line = match expected {
                    Some(total) if total > 0 => format!(
                        "{} / {} files ({:.0}%)  {current_path}",
                        format_count(done),
                        format_count(total),
                        done as f64 * 100.0 / total as f64
                    ),
                    _ => format!("{} files  {current_path}", format_count(done)),
                };
                let _ = write!(stderr, "\r\x1b[2K{line}");
            }
            ScanProgress::Error { .. } => {}
            ScanProgress::Complete { duration, .. } => {
                let _ = writeln!(stderr, "\r\x1b[2KScan finished in {duration:.2?}");
                break;
            }
            ScanProgress::Cancelled => {
                let _ = writeln!(stderr, "\r\x1b[2KScan cancelled");
                break;
            }
        }
    }
}

fn print_summary(view: &ReportView<'_>) {
    let label_w = view
        .rows()
        .map(|r| r.label.len())
        .chain(["Media type".len()])
        .max()
        .unwrap_or(0);

    println!("Directory analysis results");
    println!("{:<label_w$}  {:>12}  {:>12}", "Media type", "Files found", "Size");
    let rule = "-".repeat(label_w + 28);
    println!("{rule}");
    for row in view.categories.iter().chain([&view.errors]) {
        println!("{:<label_w$}  {:>12}  {:>12}", row.label, format_count(row.files), row.size);
    }
    println!("{rule}");
    let t = &view.totals;
    println!("{:<label_w$}  {:>12}  {:>12}", t.label, format_count(t.files), t.size);

    if view.cancelled {
        warn!("scan was cancelled; totals are partial");
    }
    println!(
        "\n{} large file(s), {} permission warning(s)",
        view.large_files.len(),
        view.permission_warnings.len()
    );
}

fn write_side_files(
    config: &Config,
    root: &Path,
    result: &ScanResult,
    view: &ReportView<'_>,
) -> Result<()> {
    let paths = &config.paths;
    report::write_large_files(&paths.bigfiles_output_path, root, &result.large_files)
        .with_context(|| format!("writing {}", paths.bigfiles_output_path.display()))?;
    report::write_permission_warnings(
        &paths.permissions_output_path,
        root,
        &result.permission_warnings,
    )
    .with_context(|| format!("writing {}", paths.permissions_output_path.display()))?;
    report::write_summary_csv(&paths.analysis_output_path, view)
        .with_context(|| format!("writing {}", paths.analysis_output_path.display()))?;

    for path in paths.iter() {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
