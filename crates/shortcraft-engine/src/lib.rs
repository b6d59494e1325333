//! Clip generation session engine.
//!
//! This crate provides:
//! - `ClipSession` guarding one generate run at a time
//! - Per-window frame sampling with a bounded seek timeout
//! - Cooperative skip that finishes from partial measurements
//! - Transcoder hand-off with phase and encode progress reporting
//! - Config from environment, structured session logging, Prometheus metrics

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod session;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use logging::{init_logging, SessionLogger};
pub use metrics::init_metrics;
pub use session::{
    render_step_label, ClipSession, GenerateRequest, GeneratedClip, PhaseCallback, PhaseUpdate,
    SessionPhase, SkipHandle, RENDER_STEPS,
};
