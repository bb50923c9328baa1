//! diarist - Speaker diarization job service
//!
//! Accepts uploaded call recordings, runs them through a staged
//! speech-understanding pipeline (transcription, alignment, diarization),
//! and synthesizes a speaker-attributed transcript with per-speaker
//! statistics. Clients submit audio, receive a job handle, and poll for
//! status/result.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod defaults;
pub mod error;
pub mod ipc;
pub mod job;
pub mod pipeline;
pub mod service;
pub mod stage;
pub mod transcript;

// Capability provider traits (normalize → transcribe → align → diarize)
pub use audio::{AudioDecoder, AudioNormalizer, WavDecoder};
pub use stage::{Aligner, Diarizer, ProviderSet, Transcriber};

// Job lifecycle
pub use job::{InMemoryJobStore, JobSnapshot, JobStatus, JobStore};

// Pipeline and synthesis
pub use pipeline::PipelineDriver;
pub use service::{DiarizationService, HealthReport};
pub use transcript::{DiarizationResult, RawSegment, SpeakerStats, SpeakerTurn};

// Error handling
pub use error::{DiaristError, Result};

// Config
pub use config::{Config, EngineKind};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
