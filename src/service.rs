//! Client-facing service façade: submission, status, deletion, health.
//!
//! Submission validates the upload synchronously, registers the job, and
//! spawns the pipeline as an independent background task. Everything a
//! client observes afterwards flows through the job store.

use crate::audio::{AudioNormalizer, TempArtifact};
use crate::defaults::SUPPORTED_EXTENSIONS;
use crate::error::{DiaristError, Result};
use crate::job::{JobSnapshot, JobStore};
use crate::pipeline::PipelineDriver;
use crate::stage::ProviderSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Readiness of one capability provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderHealth {
    pub name: String,
    pub ready: bool,
}

/// Read-only service introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub providers: Vec<ProviderHealth>,
    pub providers_ready: bool,
    pub active_jobs: usize,
}

/// Orchestrates job submission and queries. Cheap to clone via `Arc`s.
pub struct DiarizationService {
    store: Arc<dyn JobStore>,
    driver: Arc<PipelineDriver>,
    providers: ProviderSet,
    upload_dir: PathBuf,
}

impl DiarizationService {
    /// Create a service writing upload artifacts into `upload_dir`.
    pub fn new(
        store: Arc<dyn JobStore>,
        providers: ProviderSet,
        normalizer: AudioNormalizer,
        upload_dir: PathBuf,
    ) -> Self {
        let driver = Arc::new(PipelineDriver::new(
            Arc::clone(&store),
            providers.clone(),
            normalizer,
        ));
        Self {
            store,
            driver,
            providers,
            upload_dir,
        }
    }

    /// Accept an upload and start a diarization job.
    ///
    /// Validation happens before any job record exists: unrecognized file
    /// extensions and empty payloads are rejected synchronously.
    pub async fn submit(&self, filename: &str, data: &[u8]) -> Result<JobSnapshot> {
        let extension = validate_extension(filename)?;
        if data.is_empty() {
            return Err(DiaristError::EmptyUpload {
                filename: filename.to_string(),
            });
        }

        let upload = TempArtifact::write(&self.upload_dir, &extension, data)?;
        let job_id = uuid::Uuid::new_v4().to_string();
        let snapshot = self.store.create(&job_id).await?;

        log::info!(
            "job {}: submitted {} ({} bytes)",
            job_id,
            filename,
            data.len()
        );

        let driver = Arc::clone(&self.driver);
        tokio::spawn(async move {
            driver.run(&job_id, upload).await;
        });

        Ok(snapshot)
    }

    /// Current snapshot of a job.
    pub async fn status(&self, job_id: &str) -> Result<JobSnapshot> {
        self.store.get(job_id).await
    }

    /// Remove a job record. A running pipeline is not interrupted; its
    /// remaining writes land in the silent no-op path.
    pub async fn delete(&self, job_id: &str) -> Result<()> {
        self.store.delete(job_id).await?;
        log::info!("job {}: deleted", job_id);
        Ok(())
    }

    /// Provider readiness and active job count.
    pub async fn health(&self) -> HealthReport {
        let providers: Vec<ProviderHealth> = self
            .providers
            .readiness()
            .into_iter()
            .map(|(name, ready)| ProviderHealth { name, ready })
            .collect();
        HealthReport {
            providers_ready: providers.iter().all(|p| p.ready),
            providers,
            active_jobs: self.store.active_count().await,
        }
    }
}

/// Check the upload filename against the recognized extensions.
///
/// Returns the lowercase extension on success.
fn validate_extension(filename: &str) -> Result<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(DiaristError::UnsupportedFormat {
            filename: filename.to_string(),
        }),
    }
}
