//! Service configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use store::VIBE_TAG_KIND;
use thiserror::Error;

/// A config file that could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Smallest mood selection a gamer may save
    pub min_mood_tags: usize,
    /// Most tags a single reel may carry
    pub max_reel_tags: usize,
    /// Tag kind offered as moods
    pub mood_tag_kind: String,
    pub max_caption_len: usize,
    /// Directory uploaded videos are written to
    pub media_root: String,
    /// Public URL prefix for uploaded videos
    pub media_base_url: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_mood_tags: 3,
            max_reel_tags: 3,
            mood_tag_kind: VIBE_TAG_KIND.to_string(),
            max_caption_len: 200,
            media_root: "media".to_string(),
            media_base_url: "http://localhost:8080/media".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
