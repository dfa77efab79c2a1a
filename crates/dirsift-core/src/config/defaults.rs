/// Built-in rule set and output paths, written out when no config file exists.
use super::{Config, OutputPaths, TypeRule};
use crate::model::Category;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tiff", "tif", "psd", "heic",
    "heif", "avif", "raw", "cr2", "nef",
];
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "rst", "csv", "tsv", "log", "html", "htm", "css", "xml", "ini", "cfg", "conf",
    "rs", "py", "c", "h", "cpp", "hpp", "java", "go", "rb", "sh", "toml", "yaml", "yml",
];
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aac", "ogg", "oga", "wma", "m4a", "opus", "mid", "midi", "aiff",
];
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp",
];
const APPLICATION_EXTENSIONS: &[&str] = &[
    "pdf", "zip", "gz", "tgz", "bz2", "xz", "zst", "7z", "rar", "tar", "iso", "dmg", "exe",
    "msi", "dll", "so", "dylib", "bin", "jar", "class", "wasm", "json", "js", "doc", "docx",
    "xls", "xlsx", "ppt", "pptx", "odt", "epub", "sqlite", "db",
];

fn rule(tag: &str, extensions: &[&str]) -> TypeRule {
    TypeRule {
        tag: tag.to_string(),
        extensions: extensions.iter().map(|e| (*e).into()).collect(),
        mime_types: Vec::new(),
    }
}

impl Default for Config {
    fn default() -> Self {
        let searchable_types = BTreeMap::from([
            (Category::Image, rule("image/", IMAGE_EXTENSIONS)),
            (Category::Text, rule("text/", TEXT_EXTENSIONS)),
            (Category::Audio, rule("audio/", AUDIO_EXTENSIONS)),
            (Category::Video, rule("video/", VIDEO_EXTENSIONS)),
            (Category::Application, rule("application/", APPLICATION_EXTENSIONS)),
        ]);
        Self {
            searchable_types,
            paths: OutputPaths::default(),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            bigfiles_output_path: PathBuf::from("./bigfiles.txt"),
            permissions_output_path: PathBuf::from("./permissions.txt"),
            analysis_output_path: PathBuf::from("./output.csv"),
        }
    }
}
