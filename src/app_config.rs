use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Standard dialect parser settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings of the standard screenplay parser
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParserConfig {
    /// Dialogue lines (labels, speech, parentheticals) that fit on one page
    #[serde(default = "default_dialogue_lines_per_page")]
    pub dialogue_lines_per_page: f64,

    /// Headings, action and transition lines that fit on one page
    #[serde(default = "default_action_lines_per_page")]
    pub action_lines_per_page: f64,

    /// Filming time per page, in minutes
    #[serde(default = "default_minutes_per_page")]
    pub minutes_per_page: f64,

    /// Lower bound for a scene's estimated duration, in minutes
    #[serde(default = "default_min_scene_minutes")]
    pub min_scene_minutes: f64,

    /// Longest accepted speaker label, in characters
    #[serde(default = "default_max_character_name_len")]
    pub max_character_name_len: usize,

    /// Most words accepted in a speaker label
    #[serde(default = "default_max_character_name_words")]
    pub max_character_name_words: usize,

    /// Additional words that disqualify a line from being a speaker label
    #[serde(default)]
    pub extra_blocked_words: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            dialogue_lines_per_page: default_dialogue_lines_per_page(),
            action_lines_per_page: default_action_lines_per_page(),
            minutes_per_page: default_minutes_per_page(),
            min_scene_minutes: default_min_scene_minutes(),
            max_character_name_len: default_max_character_name_len(),
            max_character_name_words: default_max_character_name_words(),
            extra_blocked_words: Vec::new(),
        }
    }
}

/// Where and how parse results are written
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OutputConfig {
    /// Directory for JSON results; next to the input when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Overwrite existing results
    #[serde(default)]
    pub force_overwrite: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_dialogue_lines_per_page() -> f64 {
    45.0 // Dialogue takes more vertical space
}

fn default_action_lines_per_page() -> f64 {
    58.0 // Action blocks are more compact
}

fn default_minutes_per_page() -> f64 {
    3.0
}

fn default_min_scene_minutes() -> f64 {
    0.5
}

fn default_max_character_name_len() -> usize {
    40
}

fn default_max_character_name_words() -> usize {
    5
}

impl Config {
    /// Load the configuration at `path`, writing a default one when the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let parser = &self.parser;

        if !(parser.dialogue_lines_per_page > 0.0) || !(parser.action_lines_per_page > 0.0) {
            return Err(anyhow!("Lines per page must be positive"));
        }

        if !(parser.minutes_per_page >= 0.0) || !(parser.min_scene_minutes >= 0.0) {
            return Err(anyhow!("Scene duration settings must not be negative"));
        }

        if parser.max_character_name_len == 0 || parser.max_character_name_words == 0 {
            return Err(anyhow!("Character name limits must be at least 1"));
        }

        if let Some(dir) = &self.output.directory {
            if dir.exists() && !dir.is_dir() {
                return Err(anyhow!("Output directory is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }
}
