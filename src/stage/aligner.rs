use crate::audio::CanonicalAudio;
use crate::error::{DiaristError, Result};
use crate::stage::TranscriptSegment;

/// Trait for refining transcript segment timestamps against the audio.
pub trait Aligner: Send + Sync {
    /// Refine segment timestamps.
    ///
    /// The returned segments carry the same text in the same order, with
    /// tighter start/end times.
    fn align(
        &self,
        segments: &[TranscriptSegment],
        audio: &CanonicalAudio,
    ) -> Result<Vec<TranscriptSegment>>;

    /// Get the name of the loaded engine
    fn name(&self) -> &str;

    /// Check if the aligner is ready
    fn is_ready(&self) -> bool;
}

/// Mock aligner for development and testing
#[derive(Debug, Clone)]
pub struct MockAligner {
    name: String,
    segments: Option<Vec<TranscriptSegment>>,
    should_fail: bool,
}

impl MockAligner {
    /// Create a new mock aligner. By default it passes segments through
    /// unchanged.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            segments: None,
            should_fail: false,
        }
    }

    /// Configure the mock to return specific refined segments
    pub fn with_segments(mut self, segments: Vec<TranscriptSegment>) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Configure the mock to fail on align
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Aligner for MockAligner {
    fn align(
        &self,
        segments: &[TranscriptSegment],
        _audio: &CanonicalAudio,
    ) -> Result<Vec<TranscriptSegment>> {
        if self.should_fail {
            return Err(DiaristError::Alignment {
                message: "mock alignment failure".to_string(),
            });
        }

        match &self.segments {
            Some(refined) => Ok(refined.clone()),
            None => Ok(segments.to_vec()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioNormalizer, MockDecoder};
    use std::path::Path;
    use std::sync::Arc;

    fn canonical() -> (tempfile::TempDir, CanonicalAudio) {
        let dir = tempfile::tempdir().unwrap();
        let decoder = MockDecoder::new().with_audio(vec![0i16; 16000], 1, 16000);
        let norm = AudioNormalizer::new(Arc::new(decoder), 16000, dir.path().to_path_buf());
        let audio = norm.normalize(Path::new("fixture.wav")).unwrap();
        (dir, audio)
    }

    #[test]
    fn test_mock_aligner_passes_through_by_default() {
        let (_dir, audio) = canonical();
        let aligner = MockAligner::new("test-aligner");
        let input = vec![
            TranscriptSegment::new("hi", 0.0, 1.0),
            TranscriptSegment::new("there", 1.0, 2.0),
        ];

        let output = aligner.align(&input, &audio).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_mock_aligner_returns_configured_segments() {
        let (_dir, audio) = canonical();
        let refined = vec![TranscriptSegment::new("hi", 0.1, 0.9)];
        let aligner = MockAligner::new("test-aligner").with_segments(refined.clone());

        let output = aligner
            .align(&[TranscriptSegment::new("hi", 0.0, 1.0)], &audio)
            .unwrap();
        assert_eq!(output, refined);
    }

    #[test]
    fn test_mock_aligner_failure() {
        let (_dir, audio) = canonical();
        let aligner = MockAligner::new("test-aligner").with_failure();

        let result = aligner.align(&[], &audio);
        assert!(matches!(result, Err(DiaristError::Alignment { .. })));
        assert!(!aligner.is_ready());
    }
}
