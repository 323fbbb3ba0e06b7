//! vidscribe - Video to Word transcript
//!
//! Turns a video file into a Word document holding its transcript:
//!
//! ```text
//! video -> ffmpeg -> mp3 -> Whisper (base) -> text -> .docx
//! ```
//!
//! # Architecture
//!
//! - `job` - Argument handling and derived file paths
//! - `audio` - Audio extraction and the temporary audio file guard
//! - `transcription` - Speech-to-text
//! - `document` - Word document output
//! - `orchestrator` - Pipeline coordination
//! - `config` - Optional TOML settings
//! - `cli` - Command-line surface
//!
//! Each external collaborator sits behind a trait ([`audio::AudioExtractor`],
//! [`transcription::Transcriber`], [`document::DocumentWriter`]), so the
//! orchestrator can run against other implementations.
//!
//! # Example
//!
//! ```rust,no_run
//! use vidscribe::config::Settings;
//! use vidscribe::job::{Job, TaskMode};
//! use vidscribe::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let job = Job::new("lecture.mp4", "ja", TaskMode::Translate)?;
//!
//!     let report = Orchestrator::new(&settings).process(&job).await?;
//!     println!("Wrote {}", report.document.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod job;
pub mod orchestrator;
mod process;
pub mod transcription;

pub use error::{Result, VidscribeError};
