/// Configuration — category rules and output paths.
///
/// The core only ever sees an already-loaded [`Config`]. Creating the default
/// file on first run is [`Config::load_or_create`]'s job and is called by the
/// binary, never by the scanner.
pub mod defaults;

use crate::model::Category;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

pub use defaults::DEFAULT_CONFIG_PATH;

/// Errors that prevent a configuration from being used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("`searchable_types` must define at least one category")]
    NoRules,
    #[error("`Other` is the fallback category and cannot have rules")]
    OtherHasRules,
    #[error("category {0} has an empty `tag`")]
    EmptyTag(Category),
    #[error("pattern `{pattern}` is assigned to both {first} and {second}")]
    DuplicatePattern {
        pattern: String,
        first: Category,
        second: Category,
    },
    #[error("directory for output file {0} does not exist")]
    MissingDirectory(PathBuf),
    #[error("no write access to {0}")]
    ReadOnly(PathBuf),
}

/// Matching rules for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRule {
    /// MIME prefix, e.g. `image/`. Used by thorough detection.
    pub tag: String,
    /// Extensions without the leading dot. Used by fast detection.
    #[serde(default)]
    pub extensions: Vec<CompactString>,
    /// Exact `type/subtype` overrides that win over any tag.
    #[serde(default)]
    pub mime_types: Vec<CompactString>,
}

/// Where the report files go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub bigfiles_output_path: PathBuf,
    pub permissions_output_path: PathBuf,
    pub analysis_output_path: PathBuf,
}

impl OutputPaths {
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [
            self.bigfiles_output_path.as_path(),
            self.permissions_output_path.as_path(),
            self.analysis_output_path.as_path(),
        ]
        .into_iter()
    }
}

/// The full configuration object injected into the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub searchable_types: BTreeMap<Category, TypeRule>,
    pub paths: OutputPaths,
}

impl Config {
    /// Parse a configuration from JSON text. `origin` is only used in errors.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read the configuration at `path`, writing the built-in default there first
    /// if the file does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if !path.exists() {
            let default = Self::default();
            let text = serde_json::to_string_pretty(&default).map_err(|source| {
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            fs::write(path, text).map_err(io_err)?;
            info!("Created default configuration at {}", path.display());
            return Ok(default);
        }
        let text = fs::read_to_string(path).map_err(io_err)?;
        Self::from_json(&text, path)
    }

    /// Check the rule set, then check that every output path is writable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_rules()?;
        self.validate_paths()
    }

    /// Rule-set checks only: non-empty, no rules on `Other`, non-empty tags,
    /// and every extension / MIME pattern owned by exactly one category.
    pub fn validate_rules(&self) -> Result<(), ConfigError> {
        if self.searchable_types.is_empty() {
            return Err(ConfigError::NoRules);
        }
        if self.searchable_types.contains_key(&Category::Other) {
            return Err(ConfigError::OtherHasRules);
        }

        let mut owners: HashMap<String, Category> = HashMap::new();
        for (&category, rule) in &self.searchable_types {
            if rule.tag.trim().is_empty() {
                return Err(ConfigError::EmptyTag(category));
            }
            let patterns = std::iter::once(rule.tag.as_str())
                .chain(rule.extensions.iter().map(|e| e.as_str()))
                .chain(rule.mime_types.iter().map(|m| m.as_str()));
            for pattern in patterns {
                let key = normalize_pattern(pattern);
                if let Some(&first) = owners.get(&key) {
                    if first != category {
                        return Err(ConfigError::DuplicatePattern {
                            pattern: key,
                            first,
                            second: category,
                        });
                    }
                }
                owners.insert(key, category);
            }
        }
        Ok(())
    }

    fn validate_paths(&self) -> Result<(), ConfigError> {
        for path in self.paths.iter() {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let dir_meta = fs::metadata(dir)
                .map_err(|_| ConfigError::MissingDirectory(path.to_path_buf()))?;
            if !dir_meta.is_dir() {
                return Err(ConfigError::MissingDirectory(path.to_path_buf()));
            }
            check_writable(path)?;
        }
        Ok(())
    }
}

/// Open `path` for writing as the current user: append to an existing file,
/// or create and remove a missing one. Contents are never touched.
fn check_writable(path: &Path) -> Result<(), ConfigError> {
    let denied = |_| ConfigError::ReadOnly(path.to_path_buf());
    if path.exists() {
        fs::OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(denied)?;
    } else {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(denied)?;
        fs::remove_file(path).map_err(denied)?;
    }
    Ok(())
}

/// Lowercase and strip a leading dot, so `.PNG` and `png` are the same key.
pub(crate) fn normalize_pattern(pattern: &str) -> String {
    pattern.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rules_only(json: &str) -> Config {
        Config::from_json(json, Path::new("test.json")).expect("parse")
    }

    #[test]
    fn default_config_is_valid() {
        Config::default().validate_rules().expect("defaults must validate");
    }

    #[test]
    fn missing_file_creates_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists(), "default config must be written");
        assert_eq!(created, Config::default());

        let reloaded = Config::load_or_create(&path).unwrap();
        assert_eq!(reloaded, created);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_or_create(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_paths_key_is_a_parse_error() {
        let json = r#"{
            "searchable_types": { "Image": { "tag": "image/" } },
            "paths": { "bigfiles_output_path": "./b.txt" }
        }"#;
        assert!(Config::from_json(json, Path::new("x")).is_err());
    }

    #[test]
    fn unknown_category_is_a_parse_error() {
        let json = r#"{
            "searchable_types": { "Archive": { "tag": "application/zip" } },
            "paths": {
                "bigfiles_output_path": "./b.txt",
                "permissions_output_path": "./p.txt",
                "analysis_output_path": "./o.csv"
            }
        }"#;
        assert!(Config::from_json(json, Path::new("x")).is_err());
    }

    #[test]
    fn mime_only_rules_without_extensions_parse() {
        let config = rules_only(
            r#"{
            "searchable_types": { "Image": { "tag": "image/" } },
            "paths": {
                "bigfiles_output_path": "./b.txt",
                "permissions_output_path": "./p.txt",
                "analysis_output_path": "./o.csv"
            }
        }"#,
        );
        let rule = &config.searchable_types[&Category::Image];
        assert!(rule.extensions.is_empty());
        config.validate_rules().unwrap();
    }

    #[test]
    fn empty_rule_set_rejected() {
        let mut config = Config::default();
        config.searchable_types.clear();
        assert!(matches!(config.validate_rules(), Err(ConfigError::NoRules)));
    }

    #[test]
    fn rules_on_other_rejected() {
        let mut config = Config::default();
        config.searchable_types.insert(
            Category::Other,
            TypeRule {
                tag: "x-other/".into(),
                extensions: Vec::new(),
                mime_types: Vec::new(),
            },
        );
        assert!(matches!(config.validate_rules(), Err(ConfigError::OtherHasRules)));
    }

    #[test]
    fn duplicate_extension_across_categories_rejected() {
        let mut config = Config::default();
        config
            .searchable_types
            .get_mut(&Category::Text)
            .unwrap()
            .extensions
            .push(".PNG".into());
        match config.validate_rules() {
            Err(ConfigError::DuplicatePattern { pattern, .. }) => assert_eq!(pattern, "png"),
            other => panic!("expected DuplicatePattern, got {other:?}"),
        }
    }

    #[test]
    fn paths_in_missing_directory_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.bigfiles_output_path = tmp.path().join("nope").join("big.txt");
        config.paths.permissions_output_path = tmp.path().join("perm.txt");
        config.paths.analysis_output_path = tmp.path().join("out.csv");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDirectory(_))
        ));
    }

    #[test]
    fn paths_in_existing_directory_accepted() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.bigfiles_output_path = tmp.path().join("big.txt");
        config.paths.permissions_output_path = tmp.path().join("perm.txt");
        config.paths.analysis_output_path = tmp.path().join("out.csv");
        config.validate().unwrap();
    }

    #[test]
    fn write_check_leaves_files_as_found() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.bigfiles_output_path = tmp.path().join("big.txt");
        config.paths.permissions_output_path = tmp.path().join("perm.txt");
        config.paths.analysis_output_path = tmp.path().join("out.csv");
        fs::write(&config.paths.bigfiles_output_path, "previous run\n").unwrap();

        config.validate().unwrap();

        assert_eq!(
            fs::read_to_string(&config.paths.bigfiles_output_path).unwrap(),
            "previous run\n"
        );
        assert!(!config.paths.permissions_output_path.exists());
        assert!(!config.paths.analysis_output_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn unwritable_directory_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let mut config = Config::default();
        config.paths.bigfiles_output_path = locked.join("big.txt");
        config.paths.permissions_output_path = tmp.path().join("perm.txt");
        config.paths.analysis_output_path = tmp.path().join("out.csv");
        let outcome = config.validate();
        let bypass = fs::write(locked.join("canary"), "").is_ok();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if bypass {
            eprintln!("skipping unwritable_directory_rejected: process can write mode-555 directories");
            return;
        }
        assert!(matches!(outcome, Err(ConfigError::ReadOnly(p)) if p == locked.join("big.txt")));
    }
}
