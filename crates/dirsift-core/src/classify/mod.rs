/// Classification — rule registry, content sniffing, and the type detector.

pub mod detector;
pub mod registry;
pub mod sniff;

pub use detector::{DetectionMode, TypeDetector};
pub use registry::CategoryRegistry;
pub use sniff::sniff_mime;
