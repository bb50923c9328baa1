use crate::audio::CanonicalAudio;
use crate::error::{DiaristError, Result};
use crate::stage::TranscriptSegment;
use std::sync::Arc;

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (real engine vs mock).
pub trait Transcriber: Send + Sync {
    /// Transcribe canonical audio into ordered, time-stamped segments.
    ///
    /// # Arguments
    /// * `audio` - Canonical mono 16kHz waveform
    ///
    /// # Returns
    /// Chronologically ordered transcript segments or error
    fn transcribe(&self, audio: &CanonicalAudio) -> Result<Vec<TranscriptSegment>>;

    /// Get the name of the loaded engine
    fn name(&self) -> &str;

    /// Check if the transcriber is ready
    fn is_ready(&self) -> bool;
}

/// Implement Transcriber for Arc<T> to allow sharing across jobs.
impl<T: Transcriber> Transcriber for Arc<T> {
    fn transcribe(&self, audio: &CanonicalAudio) -> Result<Vec<TranscriptSegment>> {
        (**self).transcribe(audio)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Mock transcriber for development and testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    name: String,
    segments: Option<Vec<TranscriptSegment>>,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            segments: None,
            should_fail: false,
        }
    }

    /// Configure the mock to return specific segments
    pub fn with_segments(mut self, segments: Vec<TranscriptSegment>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, audio: &CanonicalAudio) -> Result<Vec<TranscriptSegment>> {
        if self.should_fail {
            return Err(DiaristError::Transcription {
                message: "mock transcription failure".to_string(),
            });
        }

        match &self.segments {
            Some(segments) => Ok(segments.clone()),
            // Default: one segment spanning the whole recording.
            None => Ok(vec![TranscriptSegment::new(
                "mock transcription",
                0.0,
                audio.duration_secs(),
            )]),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}
