//! Error types for diarist.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaristError {
    // Submission validation errors
    #[error("Unsupported file format: {filename}. Please upload MP3, WAV, M4A, or FLAC files")]
    UnsupportedFormat { filename: String },

    #[error("Empty upload: {filename}")]
    EmptyUpload { filename: String },

    // Audio normalization errors
    #[error("Audio decoding failed: {message}")]
    AudioDecode { message: String },

    #[error("Audio conversion failed: {message}")]
    AudioConvert { message: String },

    // Stage provider errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Alignment failed: {message}")]
    Alignment { message: String },

    #[error("Diarization failed: {message}")]
    Diarization { message: String },

    // Job registry errors
    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: String },

    #[error("Job already exists: {job_id}")]
    DuplicateJob { job_id: String },

    // Invariant violations (programmer-facing, never user-facing)
    #[error("Progress may not regress on job {job_id}: {current} -> {requested}")]
    InvalidProgress {
        job_id: String,
        current: f64,
        requested: f64,
    },

    #[error("Invalid state transition on job {job_id}: {message}")]
    InvalidState { job_id: String, message: String },

    #[error("Audio duration must be positive, got {duration}")]
    InvalidAudioDuration { duration: f64 },

    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // IPC errors
    #[error("IPC socket error: {message}")]
    IpcSocket { message: String },

    #[error("IPC protocol error: {message}")]
    IpcProtocol { message: String },

    #[error("IPC connection failed: {message}")]
    IpcConnection { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DiaristError>;
