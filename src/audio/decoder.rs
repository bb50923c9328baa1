//! Audio decoding seam.
//!
//! Decoding arbitrary container formats is a collaborator concern; the
//! pipeline only needs interleaved PCM. The shipped [`WavDecoder`] covers
//! WAV via `hound`; other formats plug in behind [`AudioDecoder`].

use crate::error::{DiaristError, Result};
use std::path::Path;

/// Raw decoded audio: interleaved 16-bit PCM frames.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved samples (frame-major: L R L R ... for stereo)
    pub samples: Vec<i16>,
    /// Number of channels
    pub channels: u16,
    /// Source sample rate in Hz
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// Trait for decoding an audio file into PCM.
///
/// This trait allows swapping implementations (real codecs vs mock).
pub trait AudioDecoder: Send + Sync {
    /// Decode the file at `path` into interleaved PCM.
    ///
    /// # Errors
    /// Returns `DiaristError::AudioDecode` when the input cannot be decoded.
    fn decode(&self, path: &Path) -> Result<DecodedAudio>;

    /// Name of the decoder implementation.
    fn name(&self) -> &str;
}

/// WAV decoder backed by `hound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl AudioDecoder for WavDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio> {
        let reader = hound::WavReader::open(path).map_err(|e| DiaristError::AudioDecode {
            message: format!("Failed to open WAV file {}: {}", path.display(), e),
        })?;

        let spec = reader.spec();
        let samples = read_samples(reader, spec)?;

        Ok(DecodedAudio {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    fn name(&self) -> &str {
        "wav"
    }
}

fn read_samples<R: std::io::Read>(
    mut reader: hound::WavReader<R>,
    spec: hound::WavSpec,
) -> Result<Vec<i16>> {
    match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DiaristError::AudioDecode {
                message: format!("Failed to read WAV samples: {}", e),
            }),
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DiaristError::AudioDecode {
                message: format!("Failed to read WAV samples: {}", e),
            }),
    }
}

/// Mock decoder for testing
#[derive(Debug, Clone)]
pub struct MockDecoder {
    audio: DecodedAudio,
    should_fail: bool,
}

impl MockDecoder {
    /// Create a mock producing one second of silent mono 16kHz audio.
    pub fn new() -> Self {
        Self {
            audio: DecodedAudio {
                samples: vec![0i16; 16000],
                channels: 1,
                sample_rate: 16000,
            },
            should_fail: false,
        }
    }

    /// Configure the PCM the mock returns.
    pub fn with_audio(mut self, samples: Vec<i16>, channels: u16, sample_rate: u32) -> Self {
        self.audio = DecodedAudio {
            samples,
            channels,
            sample_rate,
        };
        self
    }

    /// Configure the mock to fail on decode.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDecoder for MockDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio> {
        if self.should_fail {
            Err(DiaristError::AudioDecode {
                message: format!("mock decode failure for {}", path.display()),
            })
        } else {
            Ok(self.audio.clone())
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_wav(dir: &Path, name: &str, sample_rate: u32, channels: u16, samples: &[i16]) -> PathBuf {
        let path = dir.join(name);
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_wav_decoder_reads_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "mono.wav", 16000, 1, &[100, 200, 300]);

        let decoded = WavDecoder.decode(&path).unwrap();

        assert_eq!(decoded.samples, vec![100, 200, 300]);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.frames(), 3);
    }

    #[test]
    fn test_wav_decoder_reads_stereo_interleaved() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "stereo.wav", 44100, 2, &[10, 20, 30, 40]);

        let decoded = WavDecoder.decode(&path).unwrap();

        assert_eq!(decoded.samples, vec![10, 20, 30, 40]);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.frames(), 2);
    }

    #[test]
    fn test_wav_decoder_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"definitely not a RIFF header").unwrap();

        let result = WavDecoder.decode(&path);
        assert!(matches!(
            result,
            Err(DiaristError::AudioDecode { .. })
        ));
    }

    #[test]
    fn test_wav_decoder_missing_file() {
        let result = WavDecoder.decode(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(
            result,
            Err(DiaristError::AudioDecode { .. })
        ));
    }

    #[test]
    fn test_mock_decoder_default_audio() {
        let decoded = MockDecoder::new().decode(Path::new("any.wav")).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.frames(), 16000);
    }

    #[test]
    fn test_mock_decoder_with_audio() {
        let decoded = MockDecoder::new()
            .with_audio(vec![1, 2, 3, 4], 2, 8000)
            .decode(Path::new("any.wav"))
            .unwrap();
        assert_eq!(decoded.samples, vec![1, 2, 3, 4]);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.frames(), 2);
    }

    #[test]
    fn test_mock_decoder_failure() {
        let result = MockDecoder::new()
            .with_failure()
            .decode(Path::new("any.wav"));
        assert!(matches!(result, Err(DiaristError::AudioDecode { .. })));
    }

    #[test]
    fn test_frames_with_zero_channels() {
        let audio = DecodedAudio {
            samples: vec![],
            channels: 0,
            sample_rate: 16000,
        };
        assert_eq!(audio.frames(), 0);
    }
}
