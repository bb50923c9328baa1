//! Default configuration constants for diarist.
//!
//! This module provides shared constants used across different components
//! to ensure consistency and eliminate duplication.

/// Canonical audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency. All audio is normalized to
/// this rate before any pipeline stage runs.
pub const SAMPLE_RATE: u32 = 16000;

/// Upload file extensions accepted at submission time (lowercase).
///
/// Anything else is rejected synchronously, before a job record exists.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac"];

/// Progress checkpoint after audio normalization.
pub const PROGRESS_NORMALIZED: f64 = 0.2;

/// Progress checkpoint after transcription.
pub const PROGRESS_TRANSCRIBED: f64 = 0.4;

/// Progress checkpoint after timestamp alignment.
pub const PROGRESS_ALIGNED: f64 = 0.6;

/// Progress checkpoint after diarization and speaker assignment.
pub const PROGRESS_DIARIZED: f64 = 0.8;

/// Progress value of a completed job.
///
/// Set by the store on `complete`; the checkpoints above are design
/// constants, not computed from stage cost.
pub const PROGRESS_COMPLETE: f64 = 1.0;

/// Prefix for temporary artifacts written during a job's pipeline run.
pub const TEMP_FILE_PREFIX: &str = "diarist";
