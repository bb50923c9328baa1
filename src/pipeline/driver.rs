//! Pipeline driver: runs the four-stage pipeline for one job and keeps the
//! job registry's progress in sync.
//!
//! Progress checkpoints are fixed design constants, not computed from stage
//! cost. Any stage failure is terminal for the job and is recorded through
//! `JobStore::fail`; nothing propagates out of [`PipelineDriver::run`].
//! Temporary files are dropped on every exit path.

use crate::audio::{AudioNormalizer, TempArtifact};
use crate::defaults::{
    PROGRESS_ALIGNED, PROGRESS_DIARIZED, PROGRESS_NORMALIZED, PROGRESS_TRANSCRIBED,
};
use crate::error::Result;
use crate::job::JobStore;
use crate::stage::{ProviderSet, SpeakerInterval, TranscriptSegment};
use crate::transcript::{DiarizationResult, RawSegment, synthesize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Drives one job at a time through normalize → transcribe → align →
/// diarize → synthesize. Shared across jobs; each job runs on its own task.
pub struct PipelineDriver {
    store: Arc<dyn JobStore>,
    providers: ProviderSet,
    normalizer: AudioNormalizer,
}

impl PipelineDriver {
    pub fn new(store: Arc<dyn JobStore>, providers: ProviderSet, normalizer: AudioNormalizer) -> Self {
        Self {
            store,
            providers,
            normalizer,
        }
    }

    /// Run the full pipeline for one job.
    ///
    /// Never returns an error: success is recorded via `complete`, failure
    /// via `fail`, and both are silent no-ops if the client deleted the job
    /// record mid-run. The upload artifact is consumed and removed here on
    /// every path.
    pub async fn run(&self, job_id: &str, upload: TempArtifact) {
        let started = Instant::now();

        match self.execute(job_id, upload.path()).await {
            Ok(mut result) => {
                result.processing_time = started.elapsed().as_secs_f64();
                log::info!(
                    "job {}: completed in {:.2}s ({} speakers)",
                    job_id,
                    result.processing_time,
                    result.total_speakers
                );
                if let Err(e) = self.store.complete(job_id, result).await {
                    log::error!("job {}: storing result failed: {}", job_id, e);
                }
            }
            Err(e) => {
                log::warn!("job {}: failed: {}", job_id, e);
                if let Err(e) = self.store.fail(job_id, e.to_string()).await {
                    log::error!("job {}: recording failure failed: {}", job_id, e);
                }
            }
        }

        // `upload` drops here; the canonical artifact was dropped inside
        // execute(). Removal is best-effort and tolerates absent files.
        drop(upload);
    }

    async fn execute(&self, job_id: &str, upload: &Path) -> Result<DiarizationResult> {
        self.store.begin(job_id).await?;

        let canonical = self.normalizer.normalize(upload)?;
        let audio_duration = canonical.duration_secs();
        self.store.advance(job_id, PROGRESS_NORMALIZED).await?;

        let segments = self.providers.transcriber.transcribe(&canonical)?;
        log::debug!("job {}: {} transcript segments", job_id, segments.len());
        self.store.advance(job_id, PROGRESS_TRANSCRIBED).await?;

        let aligned = self.providers.aligner.align(&segments, &canonical)?;
        self.store.advance(job_id, PROGRESS_ALIGNED).await?;

        let intervals = self.providers.diarizer.diarize(&canonical)?;
        let labeled = assign_speakers(&aligned, &intervals);
        self.store.advance(job_id, PROGRESS_DIARIZED).await?;

        synthesize(&labeled, audio_duration)
    }
}

/// Attach diarizer speaker labels to aligned transcript segments.
///
/// A segment's speaker is the label of the first diarized interval that
/// contains the segment's temporal midpoint. Segments whose midpoint falls
/// in a diarization gap stay unlabeled and are excluded downstream.
pub fn assign_speakers(
    segments: &[TranscriptSegment],
    intervals: &[SpeakerInterval],
) -> Vec<RawSegment> {
    segments
        .iter()
        .map(|segment| {
            let speaker = intervals
                .iter()
                .find(|interval| interval.contains(segment.midpoint()))
                .map(|interval| interval.speaker.clone());
            RawSegment {
                speaker,
                text: segment.text.clone(),
                start: segment.start,
                end: segment.end,
            }
        })
        .collect()
}
