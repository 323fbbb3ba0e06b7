//! CLI module for vidscribe.

mod output;
pub mod preflight;
mod transcribe;

pub use output::{format_duration, Output};
pub use transcribe::{print_usage, run_transcribe, RunOutcome};

use clap::Parser;

/// vidscribe - Video to Word transcript
///
/// Extracts the audio of a video with ffmpeg, transcribes or translates it
/// with Whisper, and saves the text as a Word document next to the video.
#[derive(Parser, Debug)]
#[command(name = "vidscribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, env = "VIDSCRIBE_CONFIG")]
    pub config: Option<String>,

    /// Video file to transcribe
    pub video_path: Option<String>,

    /// Spoken language code passed to Whisper (e.g. "ja", "en")
    pub lang_code: Option<String>,

    /// Pass "translate" to translate the speech into English
    pub translate: Option<String>,
}

impl Cli {
    /// The positional arguments that were supplied, in order.
    pub fn positionals(&self) -> Vec<String> {
        [&self.video_path, &self.lang_code, &self.translate]
            .into_iter()
            .map_while(|arg| arg.clone())
            .collect()
    }
}
