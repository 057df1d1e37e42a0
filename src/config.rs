use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_PRIMARY_LANG: &str = "ja";
const DEFAULT_SECONDARY_LANG: &str = "en";
const DEFAULT_RELEVANCE_LANGUAGE: &str = "ja";
const DEFAULT_MAX_VIDEOS: usize = 3;
const DEFAULT_MIN_VIEW_COUNT: u64 = 10_000;
const DEFAULT_MAX_TRANSCRIPT_CHARS: usize = 15_000;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_model: Option<String>,
    pub primary_lang: Option<String>,
    pub secondary_lang: Option<String>,
    pub relevance_language: Option<String>,
    pub max_videos: Option<usize>,
    pub min_view_count: Option<u64>,
    pub max_transcript_chars: Option<usize>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// Fully-resolved runtime settings: config-file values merged with CLI
/// overrides and the provider credentials, constructed once at startup and
/// passed by reference into every collaborator.
#[derive(Debug, Clone)]
pub struct Settings {
    pub youtube_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub model: String,
    pub primary_lang: String,
    pub secondary_lang: String,
    pub relevance_language: String,
    pub max_videos: usize,
    pub min_view_count: u64,
    pub max_transcript_chars: usize,
}

impl Settings {
    /// Merge precedence: CLI flag > config file > built-in default
    pub fn resolve(
        config: &Config,
        youtube_api_key: Option<String>,
        openai_api_key: Option<String>,
        model: Option<String>,
        lang: Option<String>,
        max_videos: Option<usize>,
    ) -> Self {
        Settings {
            youtube_api_key,
            openai_api_key,
            model: model
                .or_else(|| config.default_model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            primary_lang: lang
                .or_else(|| config.primary_lang.clone())
                .unwrap_or_else(|| DEFAULT_PRIMARY_LANG.to_string()),
            secondary_lang: config
                .secondary_lang
                .clone()
                .unwrap_or_else(|| DEFAULT_SECONDARY_LANG.to_string()),
            relevance_language: config
                .relevance_language
                .clone()
                .unwrap_or_else(|| DEFAULT_RELEVANCE_LANGUAGE.to_string()),
            max_videos: max_videos.or(config.max_videos).unwrap_or(DEFAULT_MAX_VIDEOS),
            min_view_count: config.min_view_count.unwrap_or(DEFAULT_MIN_VIEW_COUNT),
            max_transcript_chars: config
                .max_transcript_chars
                .unwrap_or(DEFAULT_MAX_TRANSCRIPT_CHARS),
        }
    }

    pub fn youtube_key(&self) -> error::Result<&str> {
        self.youtube_api_key.as_deref().ok_or_else(|| Error::MissingApiKey {
            env_var: "YOUTUBE_API_KEY".to_string(),
        })
    }

    pub fn openai_key(&self) -> error::Result<&str> {
        self.openai_api_key.as_deref().ok_or_else(|| Error::MissingApiKey {
            env_var: "OPENAI_API_KEY".to_string(),
        })
    }
}
