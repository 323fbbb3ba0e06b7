//! OpenAI Whisper CLI transcription implementation.

use super::Transcriber;
use crate::error::{Result, VidscribeError};
use crate::job::TaskMode;
use crate::process::{own_process_group, stderr_tail};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Model variant loaded for every run.
pub const WHISPER_MODEL: &str = "base";

/// Fields of Whisper's JSON result that we read.
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    text: String,
}

/// Whisper transcriber backed by the `whisper` command-line tool.
pub struct WhisperCli {
    binary: PathBuf,
    device: Option<String>,
    fp16: bool,
}

impl WhisperCli {
    /// Use `whisper` from PATH on the default device.
    pub fn new() -> Self {
        Self::with_config("whisper", None, false)
    }

    /// Create a transcriber with a specific binary and runtime options.
    pub fn with_config(binary: impl Into<PathBuf>, device: Option<String>, fp16: bool) -> Self {
        Self {
            binary: binary.into(),
            device,
            fp16,
        }
    }

    fn command(&self, audio_path: &Path, language: &str, mode: TaskMode, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(audio_path)
            .arg("--model").arg(WHISPER_MODEL)
            .arg("--language").arg(language)
            .arg("--task").arg(mode.as_str())
            .arg("--output_format").arg("json")
            .arg("--output_dir").arg(output_dir)
            .arg("--verbose").arg("False")
            .arg("--fp16").arg(if self.fp16 { "True" } else { "False" });

        if let Some(device) = &self.device {
            cmd.arg("--device").arg(device);
        }

        own_process_group(&mut cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for WhisperCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path, language: &str, mode: TaskMode) -> Result<String> {
        let output_dir = tempfile::tempdir()?;

        info!("Running Whisper {} model ({})", WHISPER_MODEL, mode);
        let result = self
            .command(audio_path, language, mode, output_dir.path())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VidscribeError::ModelUnavailable(format!(
                    "'{}' not found. Install it with: pip install openai-whisper",
                    self.binary.display()
                )));
            }
            Err(e) => {
                return Err(VidscribeError::Inference(format!("whisper execution failed: {e}")));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VidscribeError::Inference(format!(
                "whisper exited with {}: {}",
                output.status,
                stderr_tail(&stderr, 5)
            )));
        }

        let text = read_result(output_dir.path(), audio_path)?;
        debug!("Recognized {} characters", text.chars().count());
        Ok(text)
    }
}

/// Read the text Whisper wrote for `audio_path` into `output_dir`.
///
/// Whisper names its result after the audio file stem.
fn read_result(output_dir: &Path, audio_path: &Path) -> Result<String> {
    let stem = audio_path
        .file_stem()
        .ok_or_else(|| VidscribeError::InvalidInput(format!("Not a file: {}", audio_path.display())))?;
    let mut file_name = stem.to_os_string();
    file_name.push(".json");
    let json_path = output_dir.join(file_name);

    let content = std::fs::read_to_string(&json_path).map_err(|e| {
        VidscribeError::Inference(format!(
            "Whisper produced no result at {}: {}",
            json_path.display(),
            e
        ))
    })?;

    let parsed: WhisperOutput = serde_json::from_str(&content)?;
    Ok(parsed.text.trim().to_string())
}
