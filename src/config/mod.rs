//! Configuration module for vidscribe.
//!
//! Handles loading the optional TOML settings file.

mod settings;

pub use settings::{
    OutputSettings, Settings, ToolSettings, TranscriptionSettings, DEFAULT_HEADING,
};
