//! Transcription module for vidscribe.
//!
//! Runs speech recognition over the extracted audio. The default backend is
//! the OpenAI Whisper CLI with the `base` model.

mod whisper;

pub use whisper::{WhisperCli, WHISPER_MODEL};

use crate::error::Result;
use crate::job::TaskMode;
use async_trait::async_trait;
use std::path::Path;

/// Trait for speech-to-text backends.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe (or translate to English) an audio file and return the
    /// recognized text.
    async fn transcribe(&self, audio_path: &Path, language: &str, mode: TaskMode)
        -> Result<String>;
}
