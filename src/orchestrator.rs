//! Pipeline orchestrator for vidscribe.
//!
//! Runs extraction, transcription and document output in order for one job.
//! The temporary audio file is held by a [`TempAudio`] guard, so it is removed
//! whether the run succeeds, fails in any stage, or is interrupted.

use crate::audio::{AudioExtractor, FfmpegExtractor, TempAudio};
use crate::cli::Output;
use crate::config::Settings;
use crate::document::{DocumentWriter, DocxWriter};
use crate::error::{Result, VidscribeError};
use crate::job::Job;
use crate::transcription::{Transcriber, WhisperCli};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::Poll;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// The main orchestrator for the vidscribe pipeline.
pub struct Orchestrator {
    extractor: Arc<dyn AudioExtractor>,
    transcriber: Arc<dyn Transcriber>,
    writer: Arc<dyn DocumentWriter>,
    heading: String,
}

impl Orchestrator {
    /// Create an orchestrator backed by ffmpeg, the Whisper CLI and docx output.
    pub fn new(settings: &Settings) -> Self {
        let extractor = Arc::new(FfmpegExtractor::with_binary(settings.ffmpeg_path()));
        let transcriber = Arc::new(WhisperCli::with_config(
            settings.whisper_path(),
            settings.transcription.device.clone(),
            settings.transcription.fp16,
        ));

        Self::with_components(
            extractor,
            transcriber,
            Arc::new(DocxWriter::new()),
            &settings.output.heading,
        )
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        extractor: Arc<dyn AudioExtractor>,
        transcriber: Arc<dyn Transcriber>,
        writer: Arc<dyn DocumentWriter>,
        heading: &str,
    ) -> Self {
        Self {
            extractor,
            transcriber,
            writer,
            heading: heading.to_string(),
        }
    }

    /// Run the pipeline, abandoning it when `interrupt` resolves first.
    ///
    /// A stage that fails after the interrupt has fired is reported as an
    /// interruption, not as a stage error.
    pub async fn run<F>(&self, job: &Job, interrupt: F) -> Result<PipelineOutcome>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        tokio::select! {
            biased;
            _ = &mut interrupt => {
                warn!("Pipeline interrupted");
                Ok(PipelineOutcome::Interrupted)
            }
            result = self.process(job) => match result {
                Ok(report) => Ok(PipelineOutcome::Completed(report)),
                Err(e) => {
                    if has_fired(interrupt.as_mut()).await {
                        warn!("Pipeline interrupted ({})", e);
                        Ok(PipelineOutcome::Interrupted)
                    } else {
                        Err(e)
                    }
                }
            },
        }
    }

    /// Extract audio, transcribe it and save the document.
    ///
    /// Stops at the first failing stage.
    #[instrument(skip(self, job), fields(video = %job.video().display(), mode = %job.mode()))]
    pub async fn process(&self, job: &Job) -> Result<PipelineReport> {
        let started = Instant::now();
        let audio = TempAudio::new(job.audio());

        Output::stage(1, "EXTRACTING AUDIO");
        Output::kv("Input Video", &file_name(job.video()));
        info!("Extracting audio to {}", audio.path().display());
        self.extractor.extract(job.video(), audio.path()).await?;
        Output::success("Audio extraction successful.");

        Output::stage(2, "RUNNING WHISPER AI");
        Output::kv("Task", &job.mode().label(job.language()));
        Output::info("Note: The AI model may take a minute to process...");
        let spinner = Output::spinner("Listening...");
        let text = self
            .transcriber
            .transcribe(audio.path(), job.language(), job.mode())
            .await;
        spinner.finish_and_clear();
        let text = text?;
        info!("Transcript has {} characters", text.chars().count());

        Output::stage(3, "SAVING WORD DOCUMENT");
        self.save(&text, job).await?;
        Output::success(&format!("Saved successfully to {}", file_name(job.document())));

        drop(audio);

        Ok(PipelineReport {
            document: job.document().to_path_buf(),
            characters: text.chars().count(),
            elapsed: started.elapsed(),
        })
    }

    /// Write the document off the async runtime thread.
    ///
    /// The writer fills a staging file that is renamed over the target only
    /// once this future completes. If the run is abandoned mid-write, the
    /// blocking task keeps going but its output is discarded.
    async fn save(&self, text: &str, job: &Job) -> Result<()> {
        let staged = StagedDocument::new(job.document());
        let writer = self.writer.clone();
        let heading = self.heading.clone();
        let body = text.to_string();
        let staging = staged.staging.clone();
        let state = staged.state.clone();

        tokio::task::spawn_blocking(move || {
            let result = writer.write(&heading, &body, &staging);
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.cancelled {
                remove_partial(&staging);
            } else if result.is_ok() {
                state.written = true;
            }
            result
        })
        .await
        .map_err(|e| VidscribeError::DocumentSave(format!("writer task failed: {e}")))??;

        staged.commit()
    }
}

/// Has `interrupt` already resolved? Never waits.
async fn has_fired<F>(mut interrupt: Pin<&mut F>) -> bool
where
    F: Future<Output = ()>,
{
    std::future::poll_fn(|cx| Poll::Ready(interrupt.as_mut().poll(cx).is_ready())).await
}

#[derive(Debug, Default)]
struct StageState {
    cancelled: bool,
    written: bool,
}

/// Document being written next to its final path.
///
/// Dropping it uncommitted removes the staging file, now or as soon as the
/// writer finishes.
struct StagedDocument {
    staging: PathBuf,
    target: PathBuf,
    state: Arc<Mutex<StageState>>,
    committed: bool,
}

impl StagedDocument {
    fn new(target: &Path) -> Self {
        let mut staging = target.as_os_str().to_os_string();
        staging.push(".partial");
        Self {
            staging: PathBuf::from(staging),
            target: target.to_path_buf(),
            state: Arc::new(Mutex::new(StageState::default())),
            committed: false,
        }
    }

    /// Move the finished document into place.
    fn commit(mut self) -> Result<()> {
        if self.target.exists() {
            warn!("Overwriting existing document {}", self.target.display());
        }
        std::fs::rename(&self.staging, &self.target).map_err(|e| {
            VidscribeError::DocumentSave(format!("cannot write {}: {}", self.target.display(), e))
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedDocument {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.cancelled = true;
        if state.written {
            remove_partial(&self.staging);
        }
    }
}

fn remove_partial(path: &Path) {
    if !path.exists() {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Discarded partial document {}", path.display()),
        Err(e) => warn!("Failed to remove partial document {}: {}", path.display(), e),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// How a pipeline run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Every stage finished.
    Completed(PipelineReport),
    /// The user interrupted the run.
    Interrupted,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Written document.
    pub document: PathBuf,
    /// Length of the transcript.
    pub characters: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::TaskMode;
    use async_trait::async_trait;
    use tokio::sync::oneshot;

    struct FakeExtractor {
        fail: bool,
    }

    #[async_trait]
    impl AudioExtractor for FakeExtractor {
        async fn extract(&self, _video: &Path, audio: &Path) -> Result<()> {
            if self.fail {
                return Err(VidscribeError::ExternalTool("ffmpeg exited with 1".into()));
            }
            std::fs::write(audio, b"ID3 fake mp3")?;
            Ok(())
        }
    }

    enum ModelBehavior {
        Text(&'static str),
        Fail,
        Hang,
        /// Fires the interrupt, then fails the way a signalled whisper does.
        KilledByInterrupt,
    }

    struct FakeModel {
        behavior: ModelBehavior,
        calls: Mutex<Vec<(String, TaskMode)>>,
        interrupt: Mutex<Option<oneshot::Sender<()>>>,
    }

    impl FakeModel {
        fn new(behavior: ModelBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: Mutex::new(Vec::new()),
                interrupt: Mutex::new(None),
            })
        }

        fn killed_by_interrupt() -> (Arc<Self>, oneshot::Receiver<()>) {
            let (tx, rx) = oneshot::channel();
            let model = Arc::new(Self {
                behavior: ModelBehavior::KilledByInterrupt,
                calls: Mutex::new(Vec::new()),
                interrupt: Mutex::new(Some(tx)),
            });
            (model, rx)
        }
    }

    #[async_trait]
    impl Transcriber for FakeModel {
        async fn transcribe(&self, audio: &Path, language: &str, mode: TaskMode) -> Result<String> {
            assert!(audio.exists(), "audio should exist during transcription");
            self.calls.lock().unwrap().push((language.to_string(), mode));
            match self.behavior {
                ModelBehavior::Text(t) => Ok(t.to_string()),
                ModelBehavior::Fail => Err(VidscribeError::Inference("CUDA out of memory".into())),
                ModelBehavior::Hang => std::future::pending().await,
                ModelBehavior::KilledByInterrupt => {
                    if let Some(tx) = self.interrupt.lock().unwrap().take() {
                        tx.send(()).unwrap();
                    }
                    Err(VidscribeError::Inference(
                        "whisper exited with signal: 2 (SIGINT)".into(),
                    ))
                }
            }
        }
    }

    struct FakeWriter {
        fail: bool,
        delay: Duration,
        written: Mutex<Vec<(String, String)>>,
    }

    impl FakeWriter {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                delay: Duration::ZERO,
                written: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                fail: false,
                delay,
                written: Mutex::new(Vec::new()),
            })
        }
    }

    impl DocumentWriter for FakeWriter {
        fn write(&self, heading: &str, body: &str, path: &Path) -> Result<()> {
            std::thread::sleep(self.delay);
            if self.fail {
                return Err(VidscribeError::DocumentSave("disk full".into()));
            }
            std::fs::write(path, body)?;
            self.written
                .lock()
                .unwrap()
                .push((heading.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn job_in(dir: &Path, mode: TaskMode) -> Job {
        let video = dir.join("lecture.mp4");
        std::fs::write(&video, b"not really a video").unwrap();
        Job::new(&video, "ja", mode).unwrap()
    }

    fn orchestrator(
        extractor_fails: bool,
        model: Arc<FakeModel>,
        writer: Arc<FakeWriter>,
    ) -> Orchestrator {
        Orchestrator::with_components(
            Arc::new(FakeExtractor {
                fail: extractor_fails,
            }),
            model,
            writer,
            "Whisper AI Transcription Result",
        )
    }

    #[tokio::test]
    async fn test_successful_run_writes_document_and_removes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);
        let model = FakeModel::new(ModelBehavior::Text("こんにちは"));
        let writer = FakeWriter::new(false);

        let report = orchestrator(false, model.clone(), writer.clone())
            .process(&job)
            .await
            .unwrap();

        assert_eq!(report.document, dir.path().join("lecture_transcript_ja.docx"));
        assert_eq!(report.characters, 5);
        assert!(job.document().exists());
        assert!(!job.audio().exists());

        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("ja".to_string(), TaskMode::Transcribe)]);
        let written = writer.written.lock().unwrap();
        assert_eq!(written[0].0, "Whisper AI Transcription Result");
        assert_eq!(written[0].1, "こんにちは");
    }

    #[tokio::test]
    async fn test_translate_mode_reaches_model() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Translate);
        let model = FakeModel::new(ModelBehavior::Text("Hello"));

        orchestrator(false, model.clone(), FakeWriter::new(false))
            .process(&job)
            .await
            .unwrap();

        assert!(dir.path().join("lecture_translated.docx").exists());
        assert_eq!(model.calls.lock().unwrap()[0].1, TaskMode::Translate);
    }

    #[tokio::test]
    async fn test_extraction_failure_creates_no_document() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);
        let model = FakeModel::new(ModelBehavior::Text("unused"));

        let err = orchestrator(true, model.clone(), FakeWriter::new(false))
            .process(&job)
            .await
            .unwrap_err();

        assert!(matches!(err, VidscribeError::ExternalTool(_)));
        assert!(!job.document().exists());
        assert!(!job.audio().exists());
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_still_removes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);

        let err = orchestrator(false, FakeModel::new(ModelBehavior::Fail), FakeWriter::new(false))
            .process(&job)
            .await
            .unwrap_err();

        assert!(matches!(err, VidscribeError::Inference(_)));
        assert!(!job.audio().exists());
        assert!(!job.document().exists());
    }

    #[tokio::test]
    async fn test_save_failure_is_reported_and_audio_removed() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);

        let err = orchestrator(
            false,
            FakeModel::new(ModelBehavior::Text("text")),
            FakeWriter::new(true),
        )
        .process(&job)
        .await
        .unwrap_err();

        assert!(matches!(err, VidscribeError::DocumentSave(_)));
        assert!(!job.audio().exists());
    }

    #[tokio::test]
    async fn test_interrupt_cleans_up_audio() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);

        let outcome = orchestrator(false, FakeModel::new(ModelBehavior::Hang), FakeWriter::new(false))
            .run(&job, tokio::time::sleep(Duration::from_millis(50)))
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Interrupted));
        assert!(!job.audio().exists());
        assert!(!job.document().exists());
    }

    #[tokio::test]
    async fn test_run_without_interrupt_completes() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);

        let outcome = orchestrator(
            false,
            FakeModel::new(ModelBehavior::Text("done")),
            FakeWriter::new(false),
        )
        .run(&job, std::future::pending())
        .await
        .unwrap();

        match outcome {
            PipelineOutcome::Completed(report) => assert_eq!(report.characters, 4),
            PipelineOutcome::Interrupted => panic!("not interrupted"),
        }
    }

    #[tokio::test]
    async fn test_stage_failure_after_interrupt_is_interruption() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);
        let (model, interrupted) = FakeModel::killed_by_interrupt();

        let outcome = orchestrator(false, model, FakeWriter::new(false))
            .run(&job, async {
                let _ = interrupted.await;
            })
            .await
            .unwrap();

        assert!(matches!(outcome, PipelineOutcome::Interrupted));
        assert!(!job.audio().exists());
        assert!(!job.document().exists());
    }

    #[tokio::test]
    async fn test_stage_failure_without_interrupt_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);

        let err = orchestrator(false, FakeModel::new(ModelBehavior::Fail), FakeWriter::new(false))
            .run(&job, std::future::pending())
            .await
            .unwrap_err();

        assert!(matches!(err, VidscribeError::Inference(_)));
    }

    #[tokio::test]
    async fn test_interrupt_during_save_leaves_no_document() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);
        let writer = FakeWriter::slow(Duration::from_millis(300));

        let outcome = orchestrator(false, FakeModel::new(ModelBehavior::Text("late")), writer.clone())
            .run(&job, tokio::time::sleep(Duration::from_millis(50)))
            .await
            .unwrap();
        assert!(matches!(outcome, PipelineOutcome::Interrupted));

        // Let the abandoned writer finish.
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(writer.written.lock().unwrap().len(), 1);
        assert!(!job.document().exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|n| n != "lecture.mp4")
            .collect();
        assert!(leftovers.is_empty(), "left behind: {leftovers:?}");
    }

    #[tokio::test]
    async fn test_save_replaces_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_in(dir.path(), TaskMode::Transcribe);
        std::fs::write(job.document(), "stale").unwrap();

        orchestrator(false, FakeModel::new(ModelBehavior::Text("fresh")), FakeWriter::new(false))
            .process(&job)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(job.document()).unwrap(), "fresh");
    }
}
