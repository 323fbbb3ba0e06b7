//! Transcribe command implementation.

use crate::cli::preflight;
use crate::cli::{format_duration, Output};
use crate::config::Settings;
use crate::job::Job;
use crate::orchestrator::{Orchestrator, PipelineOutcome};
use anyhow::Result;
use console::style;
use std::path::PathBuf;
use tracing::warn;

/// How the command ended without an error.
#[derive(Debug)]
pub enum RunOutcome {
    /// Not enough arguments; usage was printed.
    Usage,
    /// The input video does not exist.
    MissingFile(PathBuf),
    /// The pipeline ran (to completion or until interrupted).
    Pipeline(PipelineOutcome),
}

/// Run the transcribe command for `<video_path> <lang_code> [translate]`.
pub async fn run_transcribe(args: &[String], settings: &Settings) -> Result<RunOutcome> {
    let mut job = match Job::from_positionals(args) {
        Ok(Some(job)) => job,
        Ok(None) => {
            print_usage();
            return Ok(RunOutcome::Usage);
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    if !job.video().exists() {
        Output::error(&format!("File Not Found: {}", job.video().display()));
        return Ok(RunOutcome::MissingFile(job.video().to_path_buf()));
    }

    if settings.output.unique_temp_audio {
        job = job.with_unique_audio();
    }

    if let Err(e) = preflight::check(settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings);
    match orchestrator.run(&job, ctrl_c()).await {
        Ok(PipelineOutcome::Completed(report)) => {
            Output::kv("Document", &report.document.display().to_string());
            Output::kv("Characters", &report.characters.to_string());
            Output::kv("Elapsed", &format_duration(report.elapsed.as_secs_f64()));
            Output::banner("  PIPELINE FINISHED SUCCESSFULLY", '*');
            Ok(RunOutcome::Pipeline(PipelineOutcome::Completed(report)))
        }
        Ok(PipelineOutcome::Interrupted) => {
            println!();
            Output::warning("Process stopped by user.");
            Ok(RunOutcome::Pipeline(PipelineOutcome::Interrupted))
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}

/// Resolves on Ctrl-C. If the handler can't be installed, never resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Print usage with examples.
pub fn print_usage() {
    Output::banner("VIDEO TRANSCRIPTION PIPELINE", '=');
    println!(
        "{}  vidscribe <video_path> <lang_code> [translate]",
        style("Usage:").bold()
    );
    println!("\nExamples:");
    println!("  Just Transcribe:  vidscribe video.mp4 ja");
    println!("  Translate to EN:  vidscribe video.mp4 ja translate");
    println!();
}
