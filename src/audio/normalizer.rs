//! Canonical waveform production.
//!
//! Every upload is converted to mono 16kHz 16-bit PCM before any pipeline
//! stage runs. The normalizer always writes a fresh artifact, even when the
//! input is already canonical, so callers have a uniform single path to
//! clean up.

use crate::audio::decoder::AudioDecoder;
use crate::defaults::TEMP_FILE_PREFIX;
use crate::error::{DiaristError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A temporary file that is deleted when the guard drops.
///
/// Deletion is best-effort: an already-removed file is not an error, and
/// nothing panics on cleanup failure.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    /// Take ownership of an existing file.
    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write `data` to a fresh uniquely-named file in `dir`.
    pub fn write(dir: &Path, extension: &str, data: &[u8]) -> Result<Self> {
        let path = dir.join(format!(
            "{}-{}.{}",
            TEMP_FILE_PREFIX,
            uuid::Uuid::new_v4(),
            extension
        ));
        std::fs::write(&path, data)?;
        Ok(Self { path })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            log::warn!("failed to remove temp artifact {}: {}", self.path.display(), e);
        }
    }
}

/// Canonical waveform: mono PCM at the target sample rate, persisted to a
/// temp artifact that lives as long as this value.
#[derive(Debug)]
pub struct CanonicalAudio {
    artifact: TempArtifact,
    samples: Vec<i16>,
    sample_rate: u32,
}

impl CanonicalAudio {
    /// Path of the persisted canonical WAV.
    pub fn path(&self) -> &Path {
        self.artifact.path()
    }

    /// Mono PCM samples at [`sample_rate`](Self::sample_rate).
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Audio duration in seconds (sample count / sample rate).
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Converts arbitrary decoded audio into the canonical waveform.
pub struct AudioNormalizer {
    decoder: Arc<dyn AudioDecoder>,
    target_rate: u32,
    out_dir: PathBuf,
}

impl AudioNormalizer {
    /// Creates a normalizer writing artifacts into `out_dir`.
    pub fn new(decoder: Arc<dyn AudioDecoder>, target_rate: u32, out_dir: PathBuf) -> Self {
        Self {
            decoder,
            target_rate,
            out_dir,
        }
    }

    /// Normalize the file at `input` to mono PCM at the target rate and
    /// persist it as a new WAV artifact. The original file is untouched.
    ///
    /// # Errors
    /// `DiaristError::AudioDecode` when the input cannot be decoded,
    /// `DiaristError::AudioConvert` when the artifact cannot be written.
    pub fn normalize(&self, input: &Path) -> Result<CanonicalAudio> {
        let decoded = self.decoder.decode(input)?;

        let mono = downmix(&decoded.samples, decoded.channels);
        let samples = resample(&mono, decoded.sample_rate, self.target_rate);

        let path = self.out_dir.join(format!(
            "{}-{}.wav",
            TEMP_FILE_PREFIX,
            uuid::Uuid::new_v4()
        ));
        write_canonical_wav(&path, &samples, self.target_rate)?;

        log::debug!(
            "normalized {} ({}ch @ {}Hz) -> {} ({} samples @ {}Hz)",
            input.display(),
            decoded.channels,
            decoded.sample_rate,
            path.display(),
            samples.len(),
            self.target_rate
        );

        Ok(CanonicalAudio {
            artifact: TempArtifact::from_path(path),
            samples,
            sample_rate: self.target_rate,
        })
    }
}

/// Downmix interleaved multi-channel PCM to mono by averaging channels.
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

fn write_canonical_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| {
        DiaristError::AudioConvert {
            message: format!("Failed to create {}: {}", path.display(), e),
        }
    })?;
    for &s in samples {
        writer
            .write_sample(s)
            .map_err(|e| DiaristError::AudioConvert {
                message: format!("Failed to write canonical WAV: {}", e),
            })?;
    }
    writer.finalize().map_err(|e| DiaristError::AudioConvert {
        message: format!("Failed to finalize canonical WAV: {}", e),
    })?;

    Ok(())
}
