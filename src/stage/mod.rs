//! Pipeline stage interfaces.
//!
//! The three inference stages are consumed as opaque capability providers:
//! given canonical audio, produce time-stamped text or speaker labels. Real
//! engines live outside this crate and plug in behind these traits; the
//! mock implementations ship in non-test code so the daemon and tests can
//! wire a working provider set without any model installed.

pub mod aligner;
pub mod diarizer;
pub mod transcriber;

pub use aligner::{Aligner, MockAligner};
pub use diarizer::{Diarizer, MockDiarizer};
pub use transcriber::{MockTranscriber, Transcriber};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One contiguous span of transcribed text with timestamps in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Temporal midpoint of the segment.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// A speaker-labeled time interval produced by the diarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerInterval {
    pub speaker: String,
    pub start: f64,
    pub end: f64,
}

impl SpeakerInterval {
    pub fn new(speaker: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            speaker: speaker.into(),
            start,
            end,
        }
    }

    /// True when `instant` falls inside this interval (inclusive bounds).
    pub fn contains(&self, instant: f64) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// The full set of capability providers the pipeline driver invokes.
#[derive(Clone)]
pub struct ProviderSet {
    pub transcriber: Arc<dyn Transcriber>,
    pub aligner: Arc<dyn Aligner>,
    pub diarizer: Arc<dyn Diarizer>,
}

impl ProviderSet {
    /// Provider set backed entirely by mocks, for development and tests.
    pub fn mock() -> Self {
        Self {
            transcriber: Arc::new(MockTranscriber::new("mock-transcriber")),
            aligner: Arc::new(MockAligner::new("mock-aligner")),
            diarizer: Arc::new(MockDiarizer::new("mock-diarizer")),
        }
    }

    /// Readiness of each provider, for health introspection.
    pub fn readiness(&self) -> Vec<(String, bool)> {
        vec![
            (self.transcriber.name().to_string(), self.transcriber.is_ready()),
            (self.aligner.name().to_string(), self.aligner.is_ready()),
            (self.diarizer.name().to_string(), self.diarizer.is_ready()),
        ]
    }

    /// True when every provider reports ready.
    pub fn all_ready(&self) -> bool {
        self.readiness().iter().all(|(_, ready)| *ready)
    }
}
