//! Pre-flight checks before expensive operations.
//!
//! Validates that ffmpeg and the Whisper CLI can be started before audio
//! extraction begins, so a missing model doesn't surface only after the
//! video has been decoded.

use crate::config::Settings;
use crate::error::{Result, VidscribeError};
use std::path::Path;
use std::process::{Command, Stdio};

/// Run all pre-flight checks for a transcription run.
pub fn check(settings: &Settings) -> Result<()> {
    check_tool(&settings.ffmpeg_path(), "-version")
        .map_err(VidscribeError::ToolNotFound)?;
    check_tool(&settings.whisper_path(), "--help").map_err(|reason| {
        VidscribeError::ModelUnavailable(format!(
            "{}. Install it with: pip install openai-whisper",
            reason
        ))
    })?;
    Ok(())
}

/// Check if an external tool starts and exits successfully.
///
/// On failure returns a description of what's wrong.
fn check_tool(binary: &Path, probe_arg: &str) -> std::result::Result<(), String> {
    let name = binary.display();
    let status = Command::new(binary)
        .arg(probe_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(s) if s.success() => Ok(()),
        Ok(_) => Err(format!("{} is installed but not working correctly", name)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(name.to_string()),
        Err(e) => Err(format!("{}: {}", name, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolSettings;

    #[test]
    fn test_missing_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            tools: ToolSettings {
                ffmpeg: dir.path().join("ffmpeg").to_string_lossy().into_owned(),
                whisper: dir.path().join("whisper").to_string_lossy().into_owned(),
            },
            ..Settings::default()
        };

        assert!(matches!(check(&settings), Err(VidscribeError::ToolNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_whisper_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            tools: ToolSettings {
                // `true` ignores its arguments and succeeds
                ffmpeg: "true".to_string(),
                whisper: dir.path().join("whisper").to_string_lossy().into_owned(),
            },
            ..Settings::default()
        };

        assert!(matches!(
            check(&settings),
            Err(VidscribeError::ModelUnavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_reported() {
        let reason = check_tool(Path::new("false"), "-version").unwrap_err();
        assert!(reason.contains("not working"));
    }
}
