//! FFmpeg command construction and execution for clip assembly.
//!
//! The selected segments are cut from the source, concatenated, cropped to
//! vertical, and encoded in one FFmpeg invocation. The `Transcoder` trait is
//! the seam the session talks through, so tests and demos can swap the real
//! encoder for a stub.

use async_trait::async_trait;
use metrics::{counter, histogram};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use shortcraft_models::{CropStrategy, Selection};

use crate::error::{MediaError, MediaResult};
use crate::progress::{ProgressCallback, TranscodeProgress};

/// Output clip width in pixels (9:16 vertical).
pub const OUTPUT_WIDTH: u32 = 405;
/// Output clip height in pixels.
pub const OUTPUT_HEIGHT: u32 = 720;
/// Output frame rate.
pub const OUTPUT_FPS: u32 = 30;
/// x264 quality level for output clips.
pub const DEFAULT_CRF: u8 = 23;
/// x264 preset for output clips.
pub const DEFAULT_PRESET: &str = "veryfast";

/// One clip assembly job: cut the selection out of `source`, crop it
/// vertical, and write the encoded clip to `output`.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    /// Source video path
    pub source: PathBuf,
    /// Destination path for the encoded clip
    pub output: PathBuf,
    /// Segments to cut, in playback order
    pub selection: Selection,
    /// Framing strategy for the vertical crop
    pub crop: CropStrategy,
}

impl TranscodeJob {
    /// Create a transcode job.
    pub fn new(
        source: impl AsRef<Path>,
        output: impl AsRef<Path>,
        selection: Selection,
        crop: CropStrategy,
    ) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            selection,
            crop,
        }
    }

    /// Expected output duration in milliseconds, for progress fractions.
    pub fn output_duration_ms(&self) -> i64 {
        (self.selection.actual_duration * 1000.0).round() as i64
    }
}

/// Builder for FFmpeg invocations.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    input_args: Vec<String>,
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input argument (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Seek position before the input (fast seek).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Limit read duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.input_arg("-t").input_arg(format!("{:.3}", seconds))
    }

    /// Set a simple video filter chain.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set a filter graph.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map an output stream.
    pub fn map(self, stream: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(stream)
    }

    /// Set the video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set the audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set the x264 CRF quality.
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set the encoder preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set the FFmpeg log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the full argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        // Progress goes to stderr as key=value lines
        args.push("-progress".to_string());
        args.push("pipe:2".to_string());

        args.extend(self.input_args.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Crop expression that carves a 9:16 slab out of the source frame.
///
/// The strategies only differ in vertical placement: face tracking biases
/// upward (faces live in the upper half of most framing), upper-third pins
/// to the top, and the rest center. Smart crop is an advisory tag for
/// renderers that can do content-aware framing; here it gets the centered
/// geometry.
fn crop_filter(crop: CropStrategy) -> String {
    let y_expr = match crop {
        CropStrategy::Center | CropStrategy::SmartCrop => "(ih-oh)/2",
        CropStrategy::FaceTrack => "(ih-oh)/3",
        CropStrategy::UpperThird => "0",
    };
    format!(
        "crop=min(iw\\,ih*9/16):min(ih\\,iw*16/9):(iw-ow)/2:{}",
        y_expr
    )
}

/// Filter chain applied after cutting: crop, scale, frame rate.
fn output_filter(crop: CropStrategy) -> String {
    format!(
        "{},scale={}:{},fps={}",
        crop_filter(crop),
        OUTPUT_WIDTH,
        OUTPUT_HEIGHT,
        OUTPUT_FPS
    )
}

/// Trim/concat graph for a multi-segment selection.
fn concat_filter(selection: &Selection, crop: CropStrategy) -> String {
    let mut graph = String::new();
    for (i, scored) in selection.windows.iter().enumerate() {
        let w = scored.window;
        graph.push_str(&format!(
            "[0:v]trim=start={:.3}:end={:.3},setpts=PTS-STARTPTS[v{i}];",
            w.start, w.end
        ));
        graph.push_str(&format!(
            "[0:a]atrim=start={:.3}:end={:.3},asetpts=PTS-STARTPTS[a{i}];",
            w.start, w.end
        ));
    }
    for i in 0..selection.window_count() {
        graph.push_str(&format!("[v{i}][a{i}]"));
    }
    graph.push_str(&format!(
        "concat=n={}:v=1:a=1[vcat][acat];[vcat]{}[vout]",
        selection.window_count(),
        output_filter(crop)
    ));
    graph
}

/// Build the FFmpeg command for a clip assembly job.
///
/// Single-segment jobs use input-side seeking (much faster than decoding
/// from zero); multi-segment jobs cut everything in one trim/concat graph.
pub fn build_clip_command(job: &TranscodeJob) -> MediaResult<FfmpegCommand> {
    if job.selection.is_empty() {
        return Err(MediaError::invalid_input(
            "transcode job has no segments to cut",
        ));
    }

    let cmd = FfmpegCommand::new(&job.source, &job.output);

    let cmd = if job.selection.window_count() == 1 {
        let w = job.selection.windows[0].window;
        cmd.seek(w.start)
            .duration(w.duration_secs())
            .video_filter(output_filter(job.crop))
    } else {
        cmd.filter_complex(concat_filter(&job.selection, job.crop))
            .map("[vout]")
            .map("[acat]")
    };

    Ok(cmd
        .video_codec("libx264")
        .crf(DEFAULT_CRF)
        .preset(DEFAULT_PRESET)
        .audio_codec("aac")
        .output_args(["-b:a", "128k", "-pix_fmt", "yuv420p", "-movflags", "+faststart"]))
}

/// Runner for FFmpeg commands with progress tracking and cancellation.
pub struct FfmpegRunner {
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout_secs: Option<u64>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self {
            cancel_rx: None,
            timeout_secs: None,
        }
    }

    /// Set the cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set a hard timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command, discarding progress.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.run_with_progress(cmd, |_| {}).await
    }

    /// Run an FFmpeg command with a progress callback.
    pub async fn run_with_progress<F>(&self, cmd: &FfmpegCommand, progress_callback: F) -> MediaResult<()>
    where
        F: Fn(TranscodeProgress) + Send + 'static,
    {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take().expect("stderr not captured");
        let mut reader = BufReader::new(stderr).lines();

        let progress_handle = tokio::spawn(async move {
            let mut current = TranscodeProgress::default();

            while let Ok(Some(line)) = reader.next_line().await {
                if let Some(progress) = parse_progress_line(&line, &mut current) {
                    progress_callback(progress.clone());
                }
            }
        });

        let result = self.wait_for_completion(&mut child).await;

        let _ = progress_handle.await;

        result
    }

    /// Wait for the child process, honoring timeout and cancellation.
    async fn wait_for_completion(&self, child: &mut Child) -> MediaResult<()> {
        let wait_future = child.wait();

        let wait_result = if let Some(timeout_secs) = self.timeout_secs {
            let timeout =
                tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), wait_future);
            match timeout.await {
                Ok(result) => result,
                Err(_) => {
                    warn!(timeout_secs, "FFmpeg timed out, killing process");
                    let _ = child.kill().await;
                    return Err(MediaError::Timeout(timeout_secs));
                }
            }
        } else {
            wait_future.await
        };

        if let Some(ref cancel_rx) = self.cancel_rx {
            if *cancel_rx.borrow() {
                info!("FFmpeg cancelled, killing process");
                let _ = child.kill().await;
                return Err(MediaError::Cancelled);
            }
        }

        let status = wait_result?;

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                None,
                status.code(),
            ))
        }
    }
}

/// Parse one line of FFmpeg's `-progress` output.
fn parse_progress_line(line: &str, current: &mut TranscodeProgress) -> Option<TranscodeProgress> {
    let line = line.trim();

    if let Some((key, value)) = line.split_once('=') {
        match key {
            "out_time_ms" | "out_time_us" => {
                // Parse microseconds or milliseconds to milliseconds
                if let Ok(us) = value.parse::<i64>() {
                    current.out_time_ms = if key == "out_time_us" { us / 1000 } else { us };
                }
            }
            "out_time" => {
                current.out_time = value.to_string();
            }
            "frame" => {
                if let Ok(frame) = value.parse() {
                    current.frame = frame;
                }
            }
            "fps" => {
                if let Ok(fps) = value.parse() {
                    current.fps = fps;
                }
            }
            "speed" => {
                if value != "N/A" {
                    if let Some(speed_str) = value.strip_suffix('x') {
                        if let Ok(speed) = speed_str.parse() {
                            current.speed = speed;
                        }
                    }
                }
            }
            "progress" => {
                if value == "end" {
                    current.is_complete = true;
                }
                return Some(current.clone());
            }
            _ => {}
        }
    }

    None
}

/// Check that the FFmpeg binary is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check that the FFprobe binary is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

/// The clip assembly collaborator the session hands finished selections to.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Assemble and encode the clip, reporting progress along the way.
    /// Returns the path of the encoded output.
    async fn render(&self, job: &TranscodeJob, progress: ProgressCallback) -> MediaResult<PathBuf>;

    /// Transcoder name for logging.
    fn name(&self) -> &'static str;
}

/// FFmpeg-backed transcoder.
pub struct CommandTranscoder {
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout_secs: Option<u64>,
}

impl CommandTranscoder {
    /// Create a transcoder with no timeout or cancellation hook.
    pub fn new() -> Self {
        Self {
            cancel_rx: None,
            timeout_secs: None,
        }
    }

    /// Attach a cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set a hard timeout for the encode.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for CommandTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for CommandTranscoder {
    async fn render(&self, job: &TranscodeJob, progress: ProgressCallback) -> MediaResult<PathBuf> {
        let cmd = build_clip_command(job)?;

        let mut runner = FfmpegRunner::new();
        if let Some(rx) = &self.cancel_rx {
            runner = runner.with_cancel(rx.clone());
        }
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }

        info!(
            source = %job.source.display(),
            output = %job.output.display(),
            segments = job.selection.window_count(),
            crop = %job.crop,
            "Starting clip encode"
        );

        let started = Instant::now();
        let result = runner.run_with_progress(&cmd, move |p| progress(p)).await;
        let elapsed = started.elapsed().as_secs_f64();

        histogram!("shortcraft_transcode_duration_seconds").record(elapsed);
        match result {
            Ok(()) => {
                counter!("shortcraft_transcode_jobs_total", "status" => "ok").increment(1);
                info!(elapsed_secs = elapsed, "Clip encode complete");
                Ok(job.output.clone())
            }
            Err(e) => {
                counter!("shortcraft_transcode_jobs_total", "status" => "failed").increment(1);
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

/// Transcoder that writes a placeholder file instead of encoding.
///
/// Emits a midway and a final progress tick so progress plumbing can be
/// exercised without FFmpeg installed.
#[derive(Debug, Clone, Default)]
pub struct StubTranscoder;

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn render(&self, job: &TranscodeJob, progress: ProgressCallback) -> MediaResult<PathBuf> {
        let total_ms = job.output_duration_ms();

        progress(TranscodeProgress {
            out_time_ms: total_ms / 2,
            speed: 1.0,
            ..Default::default()
        });

        tokio::fs::write(&job.output, b"").await?;

        progress(TranscodeProgress {
            out_time_ms: total_ms,
            speed: 1.0,
            is_complete: true,
            ..Default::default()
        });

        Ok(job.output.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortcraft_models::{ScoredWindow, SignalScores, Window};

    fn selection_of(segments: &[(f64, f64)]) -> Selection {
        let windows = segments
            .iter()
            .map(|&(start, end)| {
                ScoredWindow::new(Window::new(start, end), SignalScores::neutral())
            })
            .collect();
        Selection::new(windows, 30.0)
    }

    #[test]
    fn test_single_segment_uses_input_seek() {
        let job = TranscodeJob::new(
            "input.mp4",
            "output.mp4",
            selection_of(&[(12.0, 42.0)]),
            CropStrategy::Center,
        );
        let args = build_clip_command(&job).unwrap().build_args();

        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"12.000".to_string()));
        assert!(args.contains(&"-t".to_string()));
        assert!(args.contains(&"30.000".to_string()));
        assert!(args.contains(&"-vf".to_string()));
        assert!(!args.contains(&"-filter_complex".to_string()));
    }

    #[test]
    fn test_multi_segment_builds_concat_graph() {
        let job = TranscodeJob::new(
            "input.mp4",
            "output.mp4",
            selection_of(&[(12.0, 15.0), (40.0, 43.0)]),
            CropStrategy::Center,
        );
        let args = build_clip_command(&job).unwrap().build_args();

        let graph_pos = args.iter().position(|a| a == "-filter_complex").unwrap();
        let graph = &args[graph_pos + 1];
        assert!(graph.contains("trim=start=12.000:end=15.000"));
        assert!(graph.contains("atrim=start=40.000:end=43.000"));
        assert!(graph.contains("concat=n=2:v=1:a=1"));
        assert!(graph.contains("scale=405:720"));
        assert!(graph.contains("fps=30"));
        assert!(args.contains(&"[vout]".to_string()));
        assert!(args.contains(&"[acat]".to_string()));
    }

    #[test]
    fn test_crop_strategies_differ_in_vertical_placement() {
        let center = crop_filter(CropStrategy::Center);
        let face = crop_filter(CropStrategy::FaceTrack);
        let upper = crop_filter(CropStrategy::UpperThird);

        assert!(center.ends_with("(ih-oh)/2"));
        assert!(face.ends_with("(ih-oh)/3"));
        assert!(upper.ends_with(":0"));
        assert_eq!(crop_filter(CropStrategy::SmartCrop), center);
    }

    #[test]
    fn test_empty_selection_rejected() {
        let job = TranscodeJob::new(
            "input.mp4",
            "output.mp4",
            Selection::new(Vec::new(), 30.0),
            CropStrategy::Center,
        );
        assert!(build_clip_command(&job).is_err());
    }

    #[test]
    fn test_build_args_shape() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4").seek(5.0).crf(23);
        let args = cmd.build_args();

        assert_eq!(args[0], "-y");
        assert!(args.contains(&"-progress".to_string()));
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        let ss_pos = args.iter().position(|a| a == "-ss").unwrap();
        let crf_pos = args.iter().position(|a| a == "-crf").unwrap();
        assert!(ss_pos < i_pos);
        assert!(crf_pos > i_pos);
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_progress_parsing() {
        let mut progress = TranscodeProgress::default();

        parse_progress_line("out_time_ms=5000000", &mut progress);
        assert_eq!(progress.out_time_ms, 5000000);

        parse_progress_line("speed=1.5x", &mut progress);
        assert!((progress.speed - 1.5).abs() < 0.01);

        parse_progress_line("speed=N/A", &mut progress);
        assert!((progress.speed - 1.5).abs() < 0.01);

        let result = parse_progress_line("progress=end", &mut progress);
        assert!(result.is_some());
        assert!(progress.is_complete);
    }

    #[test]
    fn test_job_output_duration() {
        let job = TranscodeJob::new(
            "in.mp4",
            "out.mp4",
            selection_of(&[(0.0, 3.0), (10.0, 13.5)]),
            CropStrategy::Center,
        );
        assert_eq!(job.output_duration_ms(), 6500);
    }

    #[tokio::test]
    async fn test_stub_transcoder_writes_output_and_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("clip.mp4");
        let job = TranscodeJob::new(
            "in.mp4",
            &output,
            selection_of(&[(0.0, 3.0)]),
            CropStrategy::Center,
        );

        let (tx, rx) = std::sync::mpsc::channel();
        let path = StubTranscoder
            .render(&job, Box::new(move |p| tx.send(p).unwrap()))
            .await
            .unwrap();

        assert_eq!(path, output);
        assert!(output.exists());

        let ticks: Vec<TranscodeProgress> = rx.try_iter().collect();
        assert_eq!(ticks.len(), 2);
        assert!(ticks.last().unwrap().is_complete);
    }
}
