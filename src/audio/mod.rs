//! Audio decoding and normalization.

pub mod decoder;
pub mod normalizer;

pub use decoder::{AudioDecoder, DecodedAudio, MockDecoder, WavDecoder};
pub use normalizer::{AudioNormalizer, CanonicalAudio, TempArtifact};
