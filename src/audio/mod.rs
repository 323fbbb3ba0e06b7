//! Audio extraction for vidscribe.
//!
//! Pulls the audio track out of a video file and owns the intermediate audio
//! file for the length of a run.

mod extractor;

pub use extractor::FfmpegExtractor;

use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Trait for audio extraction tools.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Write the audio track of `video` to `audio`, overwriting it.
    async fn extract(&self, video: &Path, audio: &Path) -> Result<()>;
}

/// Intermediate audio file that is removed when the guard is dropped.
///
/// The file is only removed if it exists, so a run that fails before ffmpeg
/// writes anything leaves the file system untouched.
#[derive(Debug)]
pub struct TempAudio {
    path: PathBuf,
}

impl TempAudio {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudio {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed temporary audio {}", self.path.display()),
            Err(e) => warn!("Failed to cleanup audio file {}: {}", self.path.display(), e),
        }
    }
}
