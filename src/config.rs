//! Store configuration.

use std::env;
use std::path::PathBuf;

use directories::UserDirs;
use log::warn;

use crate::storage::Codec;

/// Overrides the base directory.
pub const STORE_DIR_ENV: &str = "JSONDATA_STORE_DIR";
/// Overrides the codec (`json`, `json-pretty`, `bitcode`).
pub const CODEC_ENV: &str = "JSONDATA_CODEC";

const DEFAULT_DIR_NAME: &str = "JsonDataStore";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory; each model type gets a sub-directory.
    pub base_dir: PathBuf,
    pub codec: Codec,
}

impl StoreConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            codec: Codec::default(),
        }
    }

    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// The default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().apply_overrides(env::var(STORE_DIR_ENV).ok(), env::var(CODEC_ENV).ok())
    }

    fn apply_overrides(mut self, dir: Option<String>, codec: Option<String>) -> Self {
        if let Some(dir) = dir.filter(|dir| !dir.trim().is_empty()) {
            self.base_dir = PathBuf::from(dir);
        }
        if let Some(codec) = codec {
            match codec.parse() {
                Ok(codec) => self.codec = codec,
                Err(err) => warn!("ignoring {}: {}", CODEC_ENV, err),
            }
        }
        self
    }
}

/// `<Documents>/JsonDataStore`, falling back to the working directory.
impl Default for StoreConfig {
    fn default() -> Self {
        let root = UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root.join(DEFAULT_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ends_in_store_dir() {
        let config = StoreConfig::default();
        assert!(config.base_dir.ends_with(DEFAULT_DIR_NAME));
        assert_eq!(config.codec, Codec::Json);
    }

    #[test]
    fn overrides_replace_dir_and_codec() {
        let config = StoreConfig::new("/a")
            .apply_overrides(Some("/b".into()), Some("json-pretty".into()));
        assert_eq!(config.base_dir, PathBuf::from("/b"));
        assert_eq!(config.codec, Codec::JsonPretty);
    }

    #[test]
    fn bad_overrides_are_ignored() {
        let config =
            StoreConfig::new("/a").apply_overrides(Some("  ".into()), Some("yaml".into()));
        assert_eq!(config, StoreConfig::new("/a"));
    }
}
