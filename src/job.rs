//! Job description: the input video, the requested task, and the file
//! paths derived from them.

use crate::error::{Result, VidscribeError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Third positional argument that switches to translation mode.
const TRANSLATE_TOKEN: &str = "translate";

/// What the speech model should do with the audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMode {
    /// Same-language transcription.
    Transcribe,
    /// Translation into English.
    Translate,
}

impl TaskMode {
    /// Interpret the optional third argument. Only `translate` (any case)
    /// selects translation; anything else is ignored.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(f) if f.eq_ignore_ascii_case(TRANSLATE_TOKEN) => TaskMode::Translate,
            _ => TaskMode::Transcribe,
        }
    }

    /// Task name understood by Whisper.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskMode::Transcribe => "transcribe",
            TaskMode::Translate => "translate",
        }
    }

    /// Human-readable description of the task.
    pub fn label(&self, language: &str) -> String {
        match self {
            TaskMode::Transcribe => format!("Transcription ({})", language),
            TaskMode::Translate => "Translation (to English)".to_string(),
        }
    }
}

impl std::fmt::Display for TaskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pipeline run.
#[derive(Debug, Clone)]
pub struct Job {
    video: PathBuf,
    language: String,
    mode: TaskMode,
    audio: PathBuf,
    document: PathBuf,
}

impl Job {
    /// Build a job from raw positional arguments
    /// (`<video_path> <lang_code> [translate]`).
    ///
    /// Returns `Ok(None)` when fewer than two arguments are given.
    pub fn from_positionals<S: AsRef<str>>(args: &[S]) -> Result<Option<Self>> {
        if args.len() < 2 {
            return Ok(None);
        }

        let mode = TaskMode::from_flag(args.get(2).map(|s| s.as_ref()));
        Self::new(args[0].as_ref(), args[1].as_ref(), mode).map(Some)
    }

    /// Create a job, resolving the video path against the current directory.
    pub fn new(video: impl AsRef<Path>, language: &str, mode: TaskMode) -> Result<Self> {
        let video = video.as_ref();
        let video = std::path::absolute(video).map_err(|e| {
            VidscribeError::InvalidInput(format!("Invalid video path '{}': {}", video.display(), e))
        })?;
        let root = video.with_extension("");

        let document = match mode {
            TaskMode::Translate => with_suffix(&root, "_translated.docx"),
            TaskMode::Transcribe => with_suffix(&root, &format!("_transcript_{}.docx", language)),
        };

        Ok(Self {
            audio: with_suffix(&root, "_temp_audio.mp3"),
            document,
            video,
            language: language.to_string(),
            mode,
        })
    }

    /// Give the temporary audio file a per-run unique name.
    pub fn with_unique_audio(mut self) -> Self {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        let root = self.video.with_extension("");
        self.audio = with_suffix(&root, &format!("_temp_audio_{}.mp3", &tag[..8]));
        self
    }

    pub fn video(&self) -> &Path {
        &self.video
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn mode(&self) -> TaskMode {
        self.mode
    }

    /// Intermediate audio file, removed when the run ends.
    pub fn audio(&self) -> &Path {
        &self.audio
    }

    /// Final Word document.
    pub fn document(&self) -> &Path {
        &self.document
    }
}

fn with_suffix(root: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(root.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
