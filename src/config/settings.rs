//! Configuration settings for vidscribe.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Heading written at the top of every generated document.
pub const DEFAULT_HEADING: &str = "Whisper AI Transcription Result";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub tools: ToolSettings,
    pub transcription: TranscriptionSettings,
    pub output: OutputSettings,
}

/// Locations of the external programs the pipeline runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// ffmpeg binary (name on PATH or a path, `~` is expanded).
    pub ffmpeg: String,
    /// OpenAI Whisper CLI binary.
    pub whisper: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            whisper: "whisper".to_string(),
        }
    }
}

/// Speech model runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Torch device for inference (e.g. "cpu", "cuda"). Whisper picks one if unset.
    pub device: Option<String>,
    /// Use half-precision inference.
    pub fp16: bool,
}

/// Output document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Heading of the generated document.
    pub heading: String,
    /// Add a random suffix to the temporary audio file so parallel runs on
    /// the same video don't collide.
    pub unique_temp_audio: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            unique_temp_audio: false,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidscribe")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded ffmpeg binary path.
    pub fn ffmpeg_path(&self) -> PathBuf {
        Self::expand_path(&self.tools.ffmpeg)
    }

    /// Get the expanded Whisper binary path.
    pub fn whisper_path(&self) -> PathBuf {
        Self::expand_path(&self.tools.whisper)
    }
}
