//! Audio extraction using ffmpeg.

use super::AudioExtractor;
use crate::error::{Result, VidscribeError};
use crate::process::{own_process_group, stderr_tail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// LAME VBR quality (0 best, 9 worst).
const MP3_QUALITY: &str = "2";

/// Lines of ffmpeg stderr kept in error messages.
const STDERR_TAIL_LINES: usize = 5;

/// Extracts the audio track of a video into an MP3 file with ffmpeg.
pub struct FfmpegExtractor {
    binary: PathBuf,
}

impl FfmpegExtractor {
    /// Use `ffmpeg` from PATH.
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    /// Use a specific ffmpeg binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    #[instrument(skip(self), fields(video = %video.display(), audio = %audio.display()))]
    async fn extract(&self, video: &Path, audio: &Path) -> Result<()> {
        debug!("Running {}", self.binary.display());

        let mut cmd = Command::new(&self.binary);
        let result = own_process_group(&mut cmd)
            .arg("-y")
            .arg("-i").arg(video)
            .arg("-vn")
            .arg("-acodec").arg("libmp3lame")
            .arg("-q:a").arg(MP3_QUALITY)
            .arg(audio)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                Err(VidscribeError::ExternalTool(format!(
                    "ffmpeg exited with {}: {}",
                    out.status,
                    stderr_tail(&err, STDERR_TAIL_LINES)
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                VidscribeError::ToolNotFound(self.binary.display().to_string()),
            ),
            Err(e) => Err(VidscribeError::ExternalTool(format!("ffmpeg error: {e}"))),
        }
    }
}
