use crate::audio::CanonicalAudio;
use crate::error::{DiaristError, Result};
use crate::stage::SpeakerInterval;

/// Trait for speaker diarization.
pub trait Diarizer: Send + Sync {
    /// Produce chronological speaker-labeled intervals for the audio.
    fn diarize(&self, audio: &CanonicalAudio) -> Result<Vec<SpeakerInterval>>;

    /// Get the name of the loaded engine
    fn name(&self) -> &str;

    /// Check if the diarizer is ready
    fn is_ready(&self) -> bool;
}

/// Mock diarizer for development and testing
#[derive(Debug, Clone)]
pub struct MockDiarizer {
    name: String,
    intervals: Option<Vec<SpeakerInterval>>,
    should_fail: bool,
}

impl MockDiarizer {
    /// Create a new mock diarizer. By default it attributes the whole
    /// recording to a single speaker.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            intervals: None,
            should_fail: false,
        }
    }

    /// Configure the mock to return specific intervals
    pub fn with_intervals(mut self, intervals: Vec<SpeakerInterval>) -> Self {
        self.intervals = Some(intervals);
        self
    }

    /// Configure the mock to fail on diarize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Diarizer for MockDiarizer {
    fn diarize(&self, audio: &CanonicalAudio) -> Result<Vec<SpeakerInterval>> {
        if self.should_fail {
            return Err(DiaristError::Diarization {
                message: "mock diarization failure".to_string(),
            });
        }

        match &self.intervals {
            Some(intervals) => Ok(intervals.clone()),
            None => Ok(vec![SpeakerInterval::new(
                "SPEAKER_00",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioNormalizer, MockDecoder};
    use std::path::Path;
    use std::sync::Arc;

    fn canonical(duration_secs: f64) -> (tempfile::TempDir, CanonicalAudio) {
        let dir = tempfile::tempdir().unwrap();
        let n = (duration_secs * 16000.0) as usize;
        let decoder = MockDecoder::new().with_audio(vec![0i16; n], 1, 16000);
        let norm = AudioNormalizer::new(Arc::new(decoder), 16000, dir.path().to_path_buf());
        let audio = norm.normalize(Path::new("fixture.wav")).unwrap();
        (dir, audio)
    }

    #[test]
    fn test_mock_diarizer_default_single_speaker() {
        let (_dir, audio) = canonical(4.0);
        let diarizer = MockDiarizer::new("test-diarizer");

        let intervals = diarizer.diarize(&audio).unwrap();

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].speaker, "SPEAKER_00");
        assert_eq!(intervals[0].start, 0.0);
        assert!((intervals[0].end - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mock_diarizer_returns_configured_intervals() {
        let (_dir, audio) = canonical(4.0);
        let diarizer = MockDiarizer::new("test-diarizer").with_intervals(vec![
            SpeakerInterval::new("SPEAKER_00", 0.0, 2.0),
            SpeakerInterval::new("SPEAKER_01", 2.0, 4.0),
        ]);

        let intervals = diarizer.diarize(&audio).unwrap();

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[1].speaker, "SPEAKER_01");
    }

    #[test]
    fn test_mock_diarizer_failure() {
        let (_dir, audio) = canonical(1.0);
        let diarizer = MockDiarizer::new("test-diarizer").with_failure();

        let result = diarizer.diarize(&audio);
        assert!(matches!(result, Err(DiaristError::Diarization { .. })));
        assert!(!diarizer.is_ready());
    }
}
