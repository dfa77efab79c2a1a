/// The closed set of semantic file-type buckets used for aggregation.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad file type categories.
///
/// Declaration order is display order; `Other` is always last and is the
/// fallback whenever no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Image,
    Text,
    Video,
    Audio,
    Application,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 6] = [
        Self::Image,
        Self::Text,
        Self::Video,
        Self::Audio,
        Self::Application,
        Self::Other,
    ];

    /// Number of categories — sizes the fixed aggregate table.
    pub const COUNT: usize = Self::ALL.len();

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Text => "Text",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Application => "Application",
            Self::Other => "Other",
        }
    }

    /// Position of this category in [`Category::ALL`].
    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive parse of a category label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
