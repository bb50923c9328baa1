//! Result synthesis: speaker-turn merging, statistics, and transcript
//! formatting.

pub mod merge;
pub mod stats;

pub use merge::merge_turns;
pub use stats::{build_stats, format_transcript};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw diarizer-labeled span, prior to merging.
///
/// Segments without a speaker label carry `speaker: None`; the synthesizer
/// skips them entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub speaker: Option<String>,
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl RawSegment {
    pub fn labeled(speaker: impl Into<String>, text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            speaker: Some(speaker.into()),
            text: text.into(),
            start,
            end,
        }
    }

    pub fn unlabeled(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            speaker: None,
            text: text.into(),
            start,
            end,
        }
    }
}

/// A maximal run of consecutive same-speaker raw segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    pub speaker: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

/// Aggregate statistics for one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStats {
    /// Sum of this speaker's turn durations in seconds
    pub total_duration: f64,
    /// Number of merged turns attributed to this speaker
    pub segment_count: usize,
    /// Whitespace-delimited tokens across this speaker's turns
    pub word_count: usize,
    /// Share of the total audio duration, in percent
    pub percentage: f64,
    /// total_duration / segment_count
    pub average_turn_duration: f64,
}

/// The synthesized outcome of a completed pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarizationResult {
    /// Formatted speaker-attributed transcript
    pub transcript: String,
    /// Per-speaker aggregate statistics
    pub speakers: BTreeMap<String, SpeakerStats>,
    /// Chronological merged speaker turns
    pub turns: Vec<SpeakerTurn>,
    /// Audio duration in seconds
    pub audio_duration: f64,
    /// Number of distinct speaker labels observed
    pub total_speakers: usize,
    /// Wall-clock pipeline time in seconds, recorded by the driver
    pub processing_time: f64,
}

/// Merge raw segments into turns and derive statistics and the formatted
/// transcript.
///
/// `processing_time` is left at zero; the pipeline driver stamps it once
/// the run finishes.
///
/// # Errors
/// `DiaristError::InvalidAudioDuration` when `audio_duration` is zero,
/// negative, or non-finite — undefined input that would otherwise produce
/// non-finite percentages.
pub fn synthesize(segments: &[RawSegment], audio_duration: f64) -> Result<DiarizationResult> {
    let turns = merge_turns(segments);
    let speakers = build_stats(&turns, audio_duration)?;
    let transcript = format_transcript(&turns);

    Ok(DiarizationResult {
        transcript,
        total_speakers: speakers.len(),
        speakers,
        turns,
        audio_duration,
        processing_time: 0.0,
    })
}
