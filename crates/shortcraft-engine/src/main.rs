//! Clip generation binary.
//!
//! Probes the source with ffprobe, runs the analysis pipeline over its
//! timeline, and renders the selected segments into a vertical clip with
//! ffmpeg. Frame sampling uses the synthetic source (no in-process
//! decoder), so measured tiers exercise the sampling machinery against
//! modeled frames; set `SHORTCRAFT_TIER` to choose one.
//!
//! Usage: `shortcraft <source.mp4> [target-secs]`

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use shortcraft_engine::{
    init_logging, init_metrics, ClipSession, EngineConfig, GenerateRequest, PhaseUpdate,
};
use shortcraft_media::{
    check_ffmpeg, probe_source, CommandTranscoder, StubTranscoder, SyntheticFrameSource,
    Transcoder,
};
use shortcraft_models::{AnalysisTier, TargetDuration};

#[tokio::main]
async fn main() {
    init_logging();
    let _metrics = init_metrics();

    info!("Starting shortcraft");

    if let Err(e) = run().await {
        error!("shortcraft failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let source = match args.next() {
        Some(path) => path,
        None => bail!("usage: shortcraft <source.mp4> [target-secs]"),
    };
    let target = match args.next() {
        Some(secs) => secs
            .parse::<TargetDuration>()
            .with_context(|| format!("invalid target duration '{}'", secs))?,
        None => TargetDuration::default(),
    };

    let config = EngineConfig::from_env();
    info!("Engine config: {:?}", config);

    let source_info = probe_source(&source)
        .await
        .with_context(|| format!("failed to probe '{}'", source))?;
    info!(
        duration_secs = source_info.duration_secs,
        width = source_info.width,
        height = source_info.height,
        "Probed source"
    );

    let transcoder: Arc<dyn Transcoder> = match check_ffmpeg() {
        Ok(_) => Arc::new(CommandTranscoder::new().with_timeout(config.transcode_timeout_secs)),
        Err(e) => {
            warn!("{}; writing a placeholder clip instead", e);
            Arc::new(StubTranscoder)
        }
    };

    let session = ClipSession::new(
        config,
        Arc::new(SyntheticFrameSource::new(source_info.duration_secs)),
        None,
        transcoder,
    )?;

    let mut request = GenerateRequest::new(&source);
    request.target = target;
    request.tier = std::env::var("SHORTCRAFT_TIER")
        .ok()
        .and_then(|s| s.parse::<AnalysisTier>().ok())
        .unwrap_or_default();

    let clip = session
        .generate_with_progress(request, Box::new(print_phase))
        .await?;

    println!("{}", serde_json::to_string_pretty(&clip)?);
    Ok(())
}

/// Print phase transitions and encode progress.
fn print_phase(update: PhaseUpdate) {
    match update.fraction {
        Some(fraction) => info!("{} ({:.0}%)", update.message, fraction * 100.0),
        None => info!("{}", update.message),
    }
}
