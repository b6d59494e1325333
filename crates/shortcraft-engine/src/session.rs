//! Clip generation session orchestration.
//!
//! A `ClipSession` owns the collaborators for one editing surface: the frame
//! source being analyzed, an optional face detector, and the transcoder that
//! assembles the final clip. One generate runs at a time; a second call while
//! one is in flight fails fast instead of queueing. Degraded inputs (seek
//! timeouts, a detector that stops answering, a user skip) shrink the
//! measurement set but never abort the run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use shortcraft_media::{
    analyze_timeline, candidate_windows, FaceDetector, FrameBuffer, FrameSource, MediaError,
    ProgressCallback, SelectionOptions, TranscodeJob, TranscodeProgress, Transcoder,
    WindowSignals,
};
use shortcraft_models::timestamp::clip_filename;
use shortcraft_models::{
    suggestion::titles_for, AnalysisResult, AnalysisTier, ClipSuggestion, SharePlatform,
    TargetDuration, UploadMeta, Window,
};

use crate::config::{clamp_seek_timeout, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::logging::SessionLogger;
use crate::metrics;

/// Captions shown while the encode runs, advanced by progress fraction.
/// Presentation copy, not a literal account of the filter graph.
pub const RENDER_STEPS: [&str; 5] = [
    "Extracting optimal clip...",
    "Converting to vertical format...",
    "Adding AI subtitles...",
    "Applying viral optimizations...",
    "Final rendering...",
];

/// Caption for a render progress fraction in [0, 1].
pub fn render_step_label(fraction: f64) -> &'static str {
    let step = ((fraction * RENDER_STEPS.len() as f64) as usize).min(RENDER_STEPS.len() - 1);
    RENDER_STEPS[step]
}

/// Lifecycle phase of a generate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Validating,
    Sampling,
    Selecting,
    Scoring,
    Recommending,
    Rendering,
    Complete,
}

impl SessionPhase {
    /// All phases in lifecycle order.
    pub const ALL: [SessionPhase; 7] = [
        SessionPhase::Validating,
        SessionPhase::Sampling,
        SessionPhase::Selecting,
        SessionPhase::Scoring,
        SessionPhase::Recommending,
        SessionPhase::Rendering,
        SessionPhase::Complete,
    ];

    /// User-facing caption for this phase.
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Validating => "Validating upload",
            SessionPhase::Sampling => "Analyzing video content",
            SessionPhase::Selecting => "Finding best moments",
            SessionPhase::Scoring => "Calculating engagement",
            SessionPhase::Recommending => "Generating recommendations",
            SessionPhase::Rendering => "Extracting optimal clip...",
            SessionPhase::Complete => "Clip ready",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One progress notification from a generate run.
#[derive(Debug, Clone)]
pub struct PhaseUpdate {
    pub phase: SessionPhase,
    /// User-facing caption for the current step
    pub message: String,
    /// Encode progress within the rendering phase
    pub fraction: Option<f64>,
}

/// Progress reporting callback, invoked on every phase transition and on
/// every parsed encode progress line.
pub type PhaseCallback = Box<dyn Fn(PhaseUpdate) + Send + Sync + 'static>;

/// Cloneable handle that requests a cooperative skip of the sampling loop.
#[derive(Debug, Clone)]
pub struct SkipHandle {
    tx: watch::Sender<bool>,
}

impl SkipHandle {
    /// Ask the in-flight generate to stop measuring and finish with
    /// whatever signals it already has.
    pub fn skip(&self) {
        // send_replace stores even while nothing subscribes; a plain send
        // would drop the request outside the sampling loop.
        self.tx.send_replace(true);
    }
}

/// One clip generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Source video path handed to the transcoder
    pub source_path: PathBuf,
    /// Upload metadata to validate before any work happens
    pub upload: Option<UploadMeta>,
    /// Target clip duration
    pub target: TargetDuration,
    /// How much real measurement to attempt
    pub tier: AnalysisTier,
}

impl GenerateRequest {
    /// Request with default target (30s) and the synthetic tier.
    pub fn new(source_path: impl AsRef<Path>) -> Self {
        Self {
            source_path: source_path.as_ref().to_path_buf(),
            upload: None,
            target: TargetDuration::default(),
            tier: AnalysisTier::default(),
        }
    }
}

/// The finished deliverable of a generate run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedClip {
    /// Rendered clip path
    pub output: PathBuf,
    /// Download-style file name of the clip
    pub file_name: String,
    /// Full analysis behind the clip
    pub analysis: AnalysisResult,
    /// Title and hashtag suggestion
    pub suggestion: ClipSuggestion,
    /// Platforms the clip can be taken to
    pub share_targets: Vec<SharePlatform>,
}

/// Clears the in-progress flag when the run exits, however it exits.
struct FlagGuard(Arc<AtomicBool>);

impl Drop for FlagGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A clip generation session.
pub struct ClipSession {
    id: Uuid,
    config: EngineConfig,
    source: Arc<dyn FrameSource>,
    detector: Option<Arc<dyn FaceDetector>>,
    transcoder: Arc<dyn Transcoder>,
    busy: Arc<AtomicBool>,
    skip_tx: watch::Sender<bool>,
}

impl ClipSession {
    /// Create a session around its collaborators.
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn FrameSource>,
        detector: Option<Arc<dyn FaceDetector>>,
        transcoder: Arc<dyn Transcoder>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let (skip_tx, _) = watch::channel(false);
        Ok(Self {
            id: Uuid::new_v4(),
            config,
            source,
            detector,
            transcoder,
            busy: Arc::new(AtomicBool::new(false)),
            skip_tx,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether a generate run is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Request a cooperative skip of the in-flight sampling loop.
    pub fn skip(&self) {
        self.skip_tx.send_replace(true);
    }

    /// Handle that can request a skip from another task.
    pub fn skip_handle(&self) -> SkipHandle {
        SkipHandle {
            tx: self.skip_tx.clone(),
        }
    }

    /// Generate a clip, discarding progress updates.
    pub async fn generate(&self, request: GenerateRequest) -> EngineResult<GeneratedClip> {
        self.generate_with_progress(request, Box::new(|_| {})).await
    }

    /// Generate a clip, reporting phase transitions and encode progress.
    ///
    /// Fails fast with `EngineError::AnalysisInProgress` while another
    /// generate is in flight; the flag is released on every exit path.
    pub async fn generate_with_progress(
        &self,
        request: GenerateRequest,
        on_phase: PhaseCallback,
    ) -> EngineResult<GeneratedClip> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngineError::AnalysisInProgress);
        }
        let _guard = FlagGuard(Arc::clone(&self.busy));

        // Fresh run, fresh skip state
        self.skip_tx.send_replace(false);

        let logger = SessionLogger::new(self.id, "generate_clip");
        let tier = request.tier;
        metrics::record_analysis_started(tier.as_str());
        let started = Instant::now();

        let result = self
            .run_generate(&request, &logger, Arc::from(on_phase))
            .await;

        match &result {
            Ok(clip) => {
                metrics::record_analysis_completed(tier.as_str(), started.elapsed().as_secs_f64());
                logger.log_completion(&format!(
                    "{} (score {}, {:.1}s)",
                    clip.file_name, clip.analysis.total_score, clip.analysis.selection.actual_duration
                ));
            }
            Err(e) => {
                metrics::record_analysis_failed(tier.as_str());
                logger.log_error(&format!("Generate failed: {}", e));
            }
        }

        result
    }

    async fn run_generate(
        &self,
        request: &GenerateRequest,
        logger: &SessionLogger,
        on_phase: Arc<dyn Fn(PhaseUpdate) + Send + Sync>,
    ) -> EngineResult<GeneratedClip> {
        let phase = |p: SessionPhase| {
            on_phase(PhaseUpdate {
                phase: p,
                message: p.label().to_string(),
                fraction: None,
            });
        };

        phase(SessionPhase::Validating);
        logger.log_start(&format!(
            "target {}, tier {}",
            request.target, request.tier
        ));
        if let Some(meta) = &request.upload {
            meta.validate()?;
        }

        let duration = self.source.duration_secs();
        let target = request.target;

        // Same geometry the analyzer will derive, so measurements line up
        // with its windows one-to-one.
        let windows = candidate_windows(duration, target)?;
        if windows.is_empty() {
            logger.log_progress("Source shorter than target, centered fallback selection");
            metrics::record_fallback_selection();
        }

        phase(SessionPhase::Sampling);
        let measurements = self.sample_windows(&windows, request.tier, logger).await;

        phase(SessionPhase::Selecting);
        let options = SelectionOptions {
            max_gap_secs: self.config.max_gap_secs,
        };
        let mut rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut measured = measurements.into_iter();
        let analysis = analyze_timeline(
            duration,
            target,
            &options,
            |_| measured.next().unwrap_or_default(),
            &mut rng,
        )?;

        phase(SessionPhase::Scoring);
        logger.log_progress(&format!(
            "Engagement {} from {} segments ({:.1}s of {})",
            analysis.total_score,
            analysis.selection.window_count(),
            analysis.selection.actual_duration,
            target
        ));

        phase(SessionPhase::Recommending);
        let titles = titles_for(analysis.content_label);
        let title_index = rng.random_range(0..titles.len());
        let suggestion =
            ClipSuggestion::assemble(analysis.content_label, title_index, analysis.total_score);

        phase(SessionPhase::Rendering);
        let output = self
            .render_clip(request, &analysis, Arc::clone(&on_phase), logger)
            .await?;

        phase(SessionPhase::Complete);

        let file_name = output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(GeneratedClip {
            output,
            file_name,
            analysis,
            suggestion,
            share_targets: SharePlatform::ALL.to_vec(),
        })
    }

    /// Sample one frame per window and measure what the tier allows.
    ///
    /// Degradations are per-window and non-fatal: a timed-out or failed
    /// sample leaves that window unmeasured, a detector error disables face
    /// detection for the rest of the run, and a skip truncates the result.
    /// The returned vec is index-aligned with `windows` up to where
    /// sampling stopped.
    async fn sample_windows(
        &self,
        windows: &[Window],
        tier: AnalysisTier,
        logger: &SessionLogger,
    ) -> Vec<WindowSignals> {
        if !tier.samples_frames() || windows.is_empty() {
            return Vec::new();
        }

        let skip_rx = self.skip_tx.subscribe();
        let timeout = Duration::from_secs(clamp_seek_timeout(self.config.seek_timeout_secs));
        let mut signals = Vec::with_capacity(windows.len());
        let mut prev_frame: Option<FrameBuffer> = None;
        let mut detector_down = false;

        for window in windows {
            if *skip_rx.borrow() {
                logger.log_progress(&format!(
                    "Skip requested after {} of {} windows",
                    signals.len(),
                    windows.len()
                ));
                metrics::record_skip();
                break;
            }

            let position = window.midpoint_secs();
            let frame = match tokio::time::timeout(timeout, self.source.sample_frame(position)).await
            {
                Ok(Ok(frame)) => frame,
                Ok(Err(e)) => {
                    logger.log_warning(&format!("Sample at {:.1}s failed: {}", position, e));
                    signals.push(WindowSignals::empty());
                    prev_frame = None;
                    continue;
                }
                Err(_) => {
                    let e = MediaError::seek_timeout(position, timeout.as_secs());
                    logger.log_warning(&e.to_string());
                    metrics::record_seek_timeout();
                    signals.push(WindowSignals::empty());
                    prev_frame = None;
                    continue;
                }
            };

            // Motion needs two consecutive good samples; the first window
            // after a gap stays synthetic.
            let activity = prev_frame.as_ref().and_then(|prev| frame.diff_score(prev));

            let face_count = if detector_down || !tier.uses_face_detection() {
                None
            } else if let Some(detector) = &self.detector {
                match detector.detect_faces(&frame).await {
                    Ok(faces) => Some(faces.len()),
                    Err(e) => {
                        logger.log_warning(&format!(
                            "Face detector '{}' dropped out: {}",
                            detector.name(),
                            e
                        ));
                        metrics::record_detector_fallback(detector.name());
                        detector_down = true;
                        None
                    }
                }
            } else {
                None
            };

            signals.push(WindowSignals {
                face_count,
                activity,
            });
            prev_frame = Some(frame);
        }

        signals
    }

    async fn render_clip(
        &self,
        request: &GenerateRequest,
        analysis: &AnalysisResult,
        on_phase: Arc<dyn Fn(PhaseUpdate) + Send + Sync>,
        logger: &SessionLogger,
    ) -> EngineResult<PathBuf> {
        tokio::fs::create_dir_all(&self.config.work_dir).await?;

        let file_name = clip_filename(request.target.as_secs(), analysis.created_at);
        let output = Path::new(&self.config.work_dir).join(&file_name);

        let job = TranscodeJob::new(
            &request.source_path,
            &output,
            analysis.selection.clone(),
            analysis.crop,
        );
        let total_ms = job.output_duration_ms();

        let progress: ProgressCallback = Box::new(move |p: TranscodeProgress| {
            let fraction = p.fraction(total_ms);
            on_phase(PhaseUpdate {
                phase: SessionPhase::Rendering,
                message: render_step_label(fraction).to_string(),
                fraction: Some(fraction),
            });
        });

        logger.log_progress(&format!(
            "Rendering {} segments with '{}'",
            analysis.selection.window_count(),
            self.transcoder.name()
        ));
        let started = Instant::now();
        let path = self.transcoder.render(&job, progress).await?;
        metrics::record_clip_rendered(self.transcoder.name(), started.elapsed().as_secs_f64());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortcraft_media::{StubTranscoder, SyntheticFrameSource};

    fn test_session(duration_secs: f64, work_dir: &Path) -> ClipSession {
        let config = EngineConfig {
            work_dir: work_dir.to_string_lossy().to_string(),
            rng_seed: Some(42),
            ..Default::default()
        };
        ClipSession::new(
            config,
            Arc::new(SyntheticFrameSource::new(duration_secs)),
            None,
            Arc::new(StubTranscoder),
        )
        .unwrap()
    }

    #[test]
    fn test_render_step_label_boundaries() {
        assert_eq!(render_step_label(0.0), "Extracting optimal clip...");
        assert_eq!(render_step_label(0.5), "Adding AI subtitles...");
        assert_eq!(render_step_label(0.99), "Final rendering...");
        assert_eq!(render_step_label(1.0), "Final rendering...");
        assert_eq!(render_step_label(3.0), "Final rendering...");
    }

    #[test]
    fn test_phase_labels_and_order() {
        assert_eq!(SessionPhase::ALL.len(), 7);
        assert_eq!(SessionPhase::ALL[0], SessionPhase::Validating);
        assert_eq!(
            SessionPhase::Sampling.label(),
            "Analyzing video content"
        );
        assert_eq!(SessionPhase::Selecting.label(), "Finding best moments");
        assert_eq!(SessionPhase::Scoring.label(), "Calculating engagement");
        assert_eq!(
            SessionPhase::Recommending.to_string(),
            "Generating recommendations"
        );
    }

    #[test]
    fn test_phase_serializes_snake_case() {
        let json = serde_json::to_value(SessionPhase::Rendering).unwrap();
        assert_eq!(json, serde_json::json!("rendering"));
    }

    #[test]
    fn test_flag_guard_clears_on_drop() {
        let flag = Arc::new(AtomicBool::new(true));
        {
            let _guard = FlagGuard(Arc::clone(&flag));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_busy_session_rejects_second_generate() {
        let dir = tempfile::tempdir().unwrap();
        let session = test_session(120.0, dir.path());

        session.busy.store(true, Ordering::SeqCst);
        let err = session
            .generate(GenerateRequest::new("source.mp4"))
            .await
            .unwrap_err();
        assert!(err.is_busy());

        session.busy.store(false, Ordering::SeqCst);
        let clip = session
            .generate(GenerateRequest::new("source.mp4"))
            .await
            .unwrap();
        assert!(!session.is_busy());
        assert!(clip.file_name.starts_with("shortcraft-30s-"));
    }

    #[tokio::test]
    async fn test_invalid_upload_clears_flag() {
        let dir = tempfile::tempdir().unwrap();
        let session = test_session(120.0, dir.path());

        let mut request = GenerateRequest::new("source.mp4");
        request.upload = Some(UploadMeta::new("photo.png", "image/png", 1024));
        let err = session.generate(request).await.unwrap_err();
        assert!(matches!(err, EngineError::Upload(_)));
        assert!(!session.is_busy());

        // Session is usable again after the rejection
        assert!(session.generate(GenerateRequest::new("source.mp4")).await.is_ok());
    }

    #[tokio::test]
    async fn test_stale_skip_does_not_cancel_next_run() {
        let dir = tempfile::tempdir().unwrap();
        let session = test_session(120.0, dir.path());

        session.skip();
        assert!(*session.skip_tx.borrow());

        let mut request = GenerateRequest::new("source.mp4");
        request.tier = AnalysisTier::MotionAware;
        let clip = session.generate(request).await.unwrap();

        // The run cleared the stale request and sampled normally.
        assert!(!*session.skip_tx.borrow());
        assert!((clip.analysis.selection.actual_duration - 30.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_short_source_takes_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let session = test_session(10.0, dir.path());

        let clip = session
            .generate(GenerateRequest::new("short.mp4"))
            .await
            .unwrap();

        assert_eq!(clip.analysis.selection.window_count(), 1);
        let window = clip.analysis.selection.windows[0].window;
        assert_eq!(window.start, 0.0);
        assert_eq!(window.end, 10.0);
        assert_eq!(clip.analysis.predicted_retention, 70);
    }
}
