//! End-to-end generate flow with stub collaborators.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use shortcraft_engine::{
    ClipSession, EngineConfig, GenerateRequest, PhaseUpdate, SessionPhase, SkipHandle,
};
use shortcraft_media::{
    FrameBuffer, FrameSource, MediaResult, ProgressCallback, StubFaceDetector, StubTranscoder,
    SyntheticFrameSource, TranscodeJob, Transcoder,
};
use shortcraft_models::{AnalysisTier, TargetDuration, UploadMeta};

fn test_config(work_dir: &std::path::Path, seed: u64) -> EngineConfig {
    EngineConfig {
        work_dir: work_dir.to_string_lossy().to_string(),
        rng_seed: Some(seed),
        ..Default::default()
    }
}

/// Frame source that counts samples and can trigger a skip mid-run.
struct CountingSource {
    inner: SyntheticFrameSource,
    samples: AtomicUsize,
    skip_after: Mutex<Option<(usize, SkipHandle)>>,
}

impl CountingSource {
    fn new(duration_secs: f64) -> Self {
        Self {
            inner: SyntheticFrameSource::new(duration_secs),
            samples: AtomicUsize::new(0),
            skip_after: Mutex::new(None),
        }
    }

    fn trigger_skip_after(&self, samples: usize, handle: SkipHandle) {
        *self.skip_after.lock().unwrap() = Some((samples, handle));
    }

    fn sample_count(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSource for CountingSource {
    async fn sample_frame(&self, position_secs: f64) -> MediaResult<FrameBuffer> {
        let n = self.samples.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, handle)) = &*self.skip_after.lock().unwrap() {
            if n >= *after {
                handle.skip();
            }
        }
        self.inner.sample_frame(position_secs).await
    }

    fn duration_secs(&self) -> f64 {
        self.inner.duration_secs()
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Frame source where one sample never completes.
struct HangingSource {
    inner: SyntheticFrameSource,
    hang_at: usize,
    calls: AtomicUsize,
}

impl HangingSource {
    fn new(duration_secs: f64, hang_at: usize) -> Self {
        Self {
            inner: SyntheticFrameSource::new(duration_secs),
            hang_at,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSource for HangingSource {
    async fn sample_frame(&self, position_secs: f64) -> MediaResult<FrameBuffer> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == self.hang_at {
            std::future::pending::<()>().await;
        }
        self.inner.sample_frame(position_secs).await
    }

    fn duration_secs(&self) -> f64 {
        self.inner.duration_secs()
    }

    fn name(&self) -> &'static str {
        "hanging"
    }
}

/// Transcoder that suspends once before rendering, so a concurrent caller
/// gets polled while the first run is still in flight.
struct YieldingTranscoder;

#[async_trait]
impl Transcoder for YieldingTranscoder {
    async fn render(&self, job: &TranscodeJob, progress: ProgressCallback) -> MediaResult<PathBuf> {
        tokio::task::yield_now().await;
        StubTranscoder.render(job, progress).await
    }

    fn name(&self) -> &'static str {
        "yielding"
    }
}

#[tokio::test]
async fn generate_produces_clip_and_ordered_phases() {
    let dir = tempfile::tempdir().unwrap();
    let session = ClipSession::new(
        test_config(dir.path(), 7),
        Arc::new(SyntheticFrameSource::new(120.0)),
        None,
        Arc::new(StubTranscoder),
    )
    .unwrap();

    let updates: Arc<Mutex<Vec<PhaseUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&updates);

    let mut request = GenerateRequest::new("video.mp4");
    request.upload = Some(UploadMeta::new("video.mp4", "video/mp4", 10 * 1024 * 1024));
    let clip = session
        .generate_with_progress(request, Box::new(move |u| sink.lock().unwrap().push(u)))
        .await
        .unwrap();

    assert!(clip.output.exists());
    assert!(clip.file_name.starts_with("shortcraft-30s-"));
    assert!(clip.file_name.ends_with(".mp4"));
    assert!((clip.analysis.selection.actual_duration - 30.0).abs() < 1e-6);
    assert!(!clip.suggestion.title.is_empty());
    assert!(clip.suggestion.hashtags.contains('#'));
    assert_eq!(clip.suggestion.sounds.len(), 5);
    assert_eq!(clip.share_targets.len(), 3);

    let phases: Vec<SessionPhase> = updates.lock().unwrap().iter().map(|u| u.phase).collect();
    assert_eq!(phases.first(), Some(&SessionPhase::Validating));
    assert_eq!(phases.last(), Some(&SessionPhase::Complete));
    let sampling = phases
        .iter()
        .position(|p| *p == SessionPhase::Sampling)
        .unwrap();
    let rendering = phases
        .iter()
        .position(|p| *p == SessionPhase::Rendering)
        .unwrap();
    assert!(sampling < rendering);

    // The stub transcoder emits encode progress, surfaced as fractions
    assert!(updates.lock().unwrap().iter().any(|u| u.fraction.is_some()));
}

#[tokio::test]
async fn concurrent_generate_rejects_second_caller() {
    let dir = tempfile::tempdir().unwrap();
    let session = Arc::new(
        ClipSession::new(
            test_config(dir.path(), 1),
            Arc::new(SyntheticFrameSource::new(120.0)),
            None,
            Arc::new(YieldingTranscoder),
        )
        .unwrap(),
    );

    let (a, b) = tokio::join!(
        session.generate(GenerateRequest::new("a.mp4")),
        session.generate(GenerateRequest::new("b.mp4")),
    );

    let errors: Vec<_> = [a, b].into_iter().filter_map(|r| r.err()).collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_busy());

    // Flag released; the session accepts new work
    assert!(!session.is_busy());
    assert!(session
        .generate(GenerateRequest::new("c.mp4"))
        .await
        .is_ok());
}

#[tokio::test]
async fn skip_finishes_from_partial_measurements() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(CountingSource::new(300.0));
    let session = ClipSession::new(
        test_config(dir.path(), 11),
        Arc::clone(&source) as Arc<dyn FrameSource>,
        Some(Arc::new(StubFaceDetector::new(1))),
        Arc::new(StubTranscoder),
    )
    .unwrap();

    source.trigger_skip_after(2, session.skip_handle());

    let mut request = GenerateRequest::new("long.mp4");
    request.tier = AnalysisTier::FaceAware;
    let clip = session.generate(request).await.unwrap();

    // Sampling stopped at the skip instead of covering all ten windows
    assert_eq!(source.sample_count(), 2);
    // but the run still delivered a complete selection
    assert!((clip.analysis.selection.actual_duration - 30.0).abs() < 1e-6);
    assert!(!session.is_busy());
}

#[tokio::test(start_paused = true)]
async fn seek_timeout_neutralizes_only_the_stuck_window() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(HangingSource::new(120.0, 1));
    let session = ClipSession::new(
        test_config(dir.path(), 13),
        Arc::clone(&source) as Arc<dyn FrameSource>,
        None,
        Arc::new(StubTranscoder),
    )
    .unwrap();

    let mut request = GenerateRequest::new("stall.mp4");
    request.tier = AnalysisTier::MotionAware;
    let clip = session.generate(request).await.unwrap();

    // Every window was attempted; the stuck one timed out and was replaced
    // with synthetic signals rather than aborting the run.
    assert_eq!(source.call_count(), 10);
    assert!((clip.analysis.selection.actual_duration - 30.0).abs() < 1e-6);
}

#[tokio::test]
async fn same_seed_reproduces_selection_and_suggestion() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let mut clips = Vec::new();
    for dir in [dir_a.path(), dir_b.path()] {
        let session = ClipSession::new(
            test_config(dir, 99),
            Arc::new(SyntheticFrameSource::new(240.0)),
            None,
            Arc::new(StubTranscoder),
        )
        .unwrap();
        let mut request = GenerateRequest::new("video.mp4");
        request.target = TargetDuration::S45;
        clips.push(session.generate(request).await.unwrap());
    }

    let (a, b) = (&clips[0], &clips[1]);
    assert_eq!(a.analysis.total_score, b.analysis.total_score);
    assert_eq!(a.analysis.crop, b.analysis.crop);
    assert_eq!(a.analysis.content_label, b.analysis.content_label);
    assert_eq!(a.analysis.predicted_retention, b.analysis.predicted_retention);
    assert_eq!(a.suggestion.title, b.suggestion.title);
    assert_eq!(
        a.analysis.selection.window_count(),
        b.analysis.selection.window_count()
    );
}

#[tokio::test]
async fn oversized_upload_rejected_before_any_work() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(CountingSource::new(120.0));
    let session = ClipSession::new(
        test_config(dir.path(), 5),
        Arc::clone(&source) as Arc<dyn FrameSource>,
        None,
        Arc::new(StubTranscoder),
    )
    .unwrap();

    let mut request = GenerateRequest::new("big.mp4");
    request.tier = AnalysisTier::MotionAware;
    request.upload = Some(UploadMeta::new("big.mp4", "video/mp4", 600 * 1024 * 1024));
    assert!(session.generate(request).await.is_err());

    // Rejected before sampling touched the source
    assert_eq!(source.sample_count(), 0);
    assert!(!session.is_busy());
}
