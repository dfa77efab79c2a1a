/// Category registry — extension and MIME lookups against the loaded rules.
use crate::config::{normalize_pattern, Config, ConfigError};
use crate::model::Category;
use compact_str::CompactString;
use std::collections::HashMap;

/// Read-only lookup tables built once from a [`Config`].
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    extensions: HashMap<CompactString, Category>,
    mime_types: HashMap<CompactString, Category>,
    /// `(tag, category)` sorted longest tag first so the most specific prefix wins.
    tags: Vec<(CompactString, Category)>,
}

impl CategoryRegistry {
    /// Build the registry, rejecting rule sets where a pattern has two owners.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate_rules()?;

        let mut registry = Self::default();
        for (&category, rule) in &config.searchable_types {
            registry
                .tags
                .push((normalize_pattern(&rule.tag).into(), category));
            for ext in &rule.extensions {
                registry
                    .extensions
                    .insert(normalize_pattern(ext).into(), category);
            }
            for mime in &rule.mime_types {
                registry
                    .mime_types
                    .insert(normalize_pattern(mime).into(), category);
            }
        }
        registry
            .tags
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Ok(registry)
    }

    /// Resolve an extension (no dot) or a `type/subtype` MIME string.
    ///
    /// Anything without a `/` is treated as an extension. Unknown keys are `Other`.
    pub fn resolve_category(&self, key: &str) -> Category {
        if key.contains('/') {
            self.resolve_mime(key)
        } else {
            self.resolve_extension(key)
        }
    }

    /// Case-insensitive extension lookup. A leading dot is tolerated.
    pub fn resolve_extension(&self, ext: &str) -> Category {
        let key = normalize_pattern(ext);
        if key.is_empty() {
            return Category::Other;
        }
        self.extensions
            .get(key.as_str())
            .copied()
            .unwrap_or(Category::Other)
    }

    /// Exact MIME override first, then the longest matching tag prefix.
    pub fn resolve_mime(&self, mime: &str) -> Category {
        let key = mime.trim().to_ascii_lowercase();
        if let Some(&category) = self.mime_types.get(key.as_str()) {
            return category;
        }
        self.tags
            .iter()
            .find(|(tag, _)| key.starts_with(tag.as_str()))
            .map(|&(_, category)| category)
            .unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeRule;

    fn default_registry() -> CategoryRegistry {
        CategoryRegistry::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn extensions_resolve_case_insensitively() {
        let reg = default_registry();
        assert_eq!(reg.resolve_category("png"), Category::Image);
        assert_eq!(reg.resolve_category("PNG"), Category::Image);
        assert_eq!(reg.resolve_extension(".Mp3"), Category::Audio);
        assert_eq!(reg.resolve_category("mkv"), Category::Video);
        assert_eq!(reg.resolve_category("txt"), Category::Text);
        assert_eq!(reg.resolve_category("pdf"), Category::Application);
    }

    #[test]
    fn unknown_and_empty_keys_fall_back_to_other() {
        let reg = default_registry();
        assert_eq!(reg.resolve_category("qqq"), Category::Other);
        assert_eq!(reg.resolve_category(""), Category::Other);
        assert_eq!(reg.resolve_category("chemical/x-pdb"), Category::Other);
    }

    #[test]
    fn mime_resolves_by_top_level_tag() {
        let reg = default_registry();
        assert_eq!(reg.resolve_category("image/png"), Category::Image);
        assert_eq!(reg.resolve_category("text/html"), Category::Text);
        assert_eq!(reg.resolve_category("application/pdf"), Category::Application);
        assert_eq!(reg.resolve_category("VIDEO/MP4"), Category::Video);
        assert_eq!(reg.resolve_category("audio/flac"), Category::Audio);
    }

    #[test]
    fn exact_mime_override_beats_tag() {
        let mut config = Config::default();
        config
            .searchable_types
            .get_mut(&Category::Text)
            .unwrap()
            .mime_types
            .push("application/json".into());
        let reg = CategoryRegistry::from_config(&config).unwrap();
        assert_eq!(reg.resolve_mime("application/json"), Category::Text);
        assert_eq!(reg.resolve_mime("application/zip"), Category::Application);
    }

    #[test]
    fn longest_tag_wins() {
        let mut config = Config::default();
        config.searchable_types.insert(
            Category::Video,
            TypeRule {
                tag: "application/vnd.rn-realmedia".into(),
                extensions: Vec::new(),
                mime_types: Vec::new(),
            },
        );
        let reg = CategoryRegistry::from_config(&config).unwrap();
        assert_eq!(reg.resolve_mime("application/vnd.rn-realmedia"), Category::Video);
        assert_eq!(reg.resolve_mime("application/pdf"), Category::Application);
        // The old video tag is gone with the replaced rule.
        assert_eq!(reg.resolve_mime("video/mp4"), Category::Other);
    }

    #[test]
    fn duplicate_patterns_rejected() {
        let mut config = Config::default();
        config
            .searchable_types
            .get_mut(&Category::Audio)
            .unwrap()
            .extensions
            .push("mp4".into());
        assert!(matches!(
            CategoryRegistry::from_config(&config),
            Err(ConfigError::DuplicatePattern { .. })
        ));
    }
}
