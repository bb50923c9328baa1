//! Per-speaker statistics and transcript rendering.

use crate::error::{DiaristError, Result};
use crate::transcript::{SpeakerStats, SpeakerTurn};
use std::collections::BTreeMap;

#[derive(Default)]
struct Accumulator {
    total_duration: f64,
    segment_count: usize,
    word_count: usize,
}

/// Aggregate turn durations and word counts per distinct speaker.
///
/// # Errors
/// `DiaristError::InvalidAudioDuration` when `audio_duration` is zero,
/// negative, or non-finite. The check runs before any division so the
/// output never contains NaN or infinite percentages.
pub fn build_stats(
    turns: &[SpeakerTurn],
    audio_duration: f64,
) -> Result<BTreeMap<String, SpeakerStats>> {
    if !audio_duration.is_finite() || audio_duration <= 0.0 {
        return Err(DiaristError::InvalidAudioDuration {
            duration: audio_duration,
        });
    }

    let mut accumulators: BTreeMap<String, Accumulator> = BTreeMap::new();
    for turn in turns {
        let entry = accumulators.entry(turn.speaker.clone()).or_default();
        entry.total_duration += turn.duration;
        entry.segment_count += 1;
        entry.word_count += turn.text.split_whitespace().count();
    }

    Ok(accumulators
        .into_iter()
        .map(|(speaker, acc)| {
            let stats = SpeakerStats {
                percentage: acc.total_duration / audio_duration * 100.0,
                average_turn_duration: acc.total_duration / acc.segment_count as f64,
                total_duration: acc.total_duration,
                segment_count: acc.segment_count,
                word_count: acc.word_count,
            };
            (speaker, stats)
        })
        .collect())
}

/// Render merged turns as a human-readable transcript.
///
/// One line per turn: `<speaker> [<start>s - <end>s]: <text>` with
/// 2-decimal timestamps, turns separated by a blank line.
pub fn format_transcript(turns: &[SpeakerTurn]) -> String {
    turns
        .iter()
        .map(|turn| {
            format!(
                "{} [{:.2}s - {:.2}s]: {}",
                turn.speaker, turn.start, turn.end, turn.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}
