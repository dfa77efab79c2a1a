/// dirsift Core — classification, aggregation, and reporting.
///
/// This crate contains all business logic with zero CLI dependencies.
/// The binary in the workspace root is a thin frontend over it.
///
/// # Modules
///
/// - [`model`] — Categories, per-file records, and the aggregated `ScanResult`.
/// - [`config`] — The configuration object, its defaults, and JSON persistence.
/// - [`classify`] — Category registry, content sniffer, and type detector.
/// - [`platform`] — Permission-bit inspection.
/// - [`scanner`] — Parallel tree walk, estimate pre-pass, and progress reporting.
/// - [`report`] — Report assembly and the writers for the output files.
pub mod classify;
pub mod config;
pub mod model;
pub mod platform;
pub mod report;
pub mod scanner;

pub use classify::{CategoryRegistry, DetectionMode, TypeDetector};
pub use config::{Config, ConfigError};
pub use model::{Category, ScanResult};
pub use scanner::{scan, ScanError, ScanOptions};
