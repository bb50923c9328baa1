//! Speaker-turn merging.
//!
//! A single left-to-right scan groups consecutive same-speaker raw segments
//! into maximal turns. Unlabeled segments are skipped entirely and do not
//! split a run of same-speaker segments around them.

use crate::transcript::{RawSegment, SpeakerTurn};

struct OpenTurn {
    speaker: String,
    text: String,
    start: f64,
    end: f64,
}

impl OpenTurn {
    fn close(self) -> SpeakerTurn {
        SpeakerTurn {
            duration: self.end - self.start,
            speaker: self.speaker,
            text: self.text,
            start: self.start,
            end: self.end,
        }
    }
}

/// Merge raw segments into chronological speaker turns. O(n) in segment
/// count.
pub fn merge_turns(segments: &[RawSegment]) -> Vec<SpeakerTurn> {
    let mut turns = Vec::new();
    let mut open: Option<OpenTurn> = None;

    for segment in segments {
        let Some(speaker) = &segment.speaker else {
            continue;
        };
        let text = segment.text.trim();

        match open.as_mut() {
            Some(turn) if turn.speaker == *speaker => {
                // Same speaker: extend the open turn. Start is never moved.
                if !text.is_empty() {
                    if !turn.text.is_empty() {
                        turn.text.push(' ');
                    }
                    turn.text.push_str(text);
                }
                turn.end = segment.end;
            }
            _ => {
                if let Some(finished) = open.take() {
                    turns.push(finished.close());
                }
                open = Some(OpenTurn {
                    speaker: speaker.clone(),
                    text: text.to_string(),
                    start: segment.start,
                    end: segment.end,
                });
            }
        }
    }

    // The trailing turn must not be dropped.
    if let Some(finished) = open {
        turns.push(finished.close());
    }

    turns
}
