/// Type detector — turns a path into a [`Category`].
///
/// Two strategies, chosen once per run:
/// - **Fast:** extension lookup in the registry. No I/O.
/// - **Thorough:** read the first few KiB and sniff a MIME type from content.
use super::registry::CategoryRegistry;
use super::sniff::{sniff_mime, SNIFF_LEN};
use crate::model::Category;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Which detection strategy a scan uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMode {
    #[default]
    Fast,
    Thorough,
}

/// Classifies files against a borrowed registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeDetector<'a> {
    registry: &'a CategoryRegistry,
    mode: DetectionMode,
}

impl<'a> TypeDetector<'a> {
    pub fn new(registry: &'a CategoryRegistry, mode: DetectionMode) -> Self {
        Self { registry, mode }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Classify `path`, reporting read failures to the caller.
    ///
    /// Fast mode never fails. Thorough mode fails only when the file cannot be
    /// opened or read; content it does not recognise is `Ok(Other)`.
    pub fn try_classify(&self, path: &Path) -> io::Result<Category> {
        match self.mode {
            DetectionMode::Fast => Ok(self.by_extension(path)),
            DetectionMode::Thorough => {
                let header = read_header(path)?;
                Ok(sniff_mime(&header)
                    .map(|mime| self.registry.resolve_mime(mime))
                    .unwrap_or(Category::Other))
            }
        }
    }

    /// Classify `path`; unreadable files come back as `Other`.
    pub fn classify(&self, path: &Path) -> Category {
        self.try_classify(path).unwrap_or_else(|err| {
            debug!("Cannot read {} for type detection: {err}", path.display());
            Category::Other
        })
    }

    fn by_extension(&self, path: &Path) -> Category {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.registry.resolve_extension(ext))
            .unwrap_or(Category::Other)
    }
}

/// Read up to [`SNIFF_LEN`] bytes from the start of the file.
fn read_header(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}
