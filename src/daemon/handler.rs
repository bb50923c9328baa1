//! Command handler implementation for the daemon.

use crate::ipc::protocol::{Command, Response};
use crate::ipc::server::CommandHandler;
use crate::service::DiarizationService;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Notify;

/// Command handler for daemon IPC commands.
pub struct DaemonCommandHandler {
    service: Arc<DiarizationService>,
    shutdown: Arc<Notify>,
}

impl DaemonCommandHandler {
    /// Creates a new command handler.
    pub fn new(service: Arc<DiarizationService>, shutdown: Arc<Notify>) -> Self {
        Self { service, shutdown }
    }

    /// Read the client-named file and submit it as a new job.
    async fn submit(&self, path: &str) -> Response {
        let filename = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) => {
                return Response::Error {
                    message: format!("Failed to read {}: {}", path, e),
                };
            }
        };

        match self.service.submit(&filename, &data).await {
            Ok(snapshot) => Response::Submitted {
                job_id: snapshot.job_id,
                status: snapshot.status,
            },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }
    }

    async fn status(&self, job_id: &str) -> Response {
        match self.service.status(job_id).await {
            Ok(job) => Response::Status { job },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }
    }

    async fn delete(&self, job_id: &str) -> Response {
        match self.service.delete(job_id).await {
            Ok(()) => Response::Deleted,
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        }
    }
}

#[async_trait::async_trait]
impl CommandHandler for DaemonCommandHandler {
    async fn handle(&self, command: Command) -> Response {
        match command {
            Command::Submit { path } => self.submit(&path).await,
            Command::Status { job_id } => self.status(&job_id).await,
            Command::Delete { job_id } => self.delete(&job_id).await,
            Command::Health => Response::Health {
                report: self.service.health().await,
            },
            Command::Shutdown => {
                self.shutdown.notify_one();
                Response::ShuttingDown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioNormalizer, MockDecoder};
    use crate::job::{InMemoryJobStore, JobStatus};
    use crate::stage::ProviderSet;
    use std::time::Duration;

    struct Fixture {
        handler: DaemonCommandHandler,
        shutdown: Arc<Notify>,
        temp_dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let temp_dir = tempfile::tempdir().unwrap();
        let store: Arc<InMemoryJobStore> = Arc::new(InMemoryJobStore::new());
        let decoder = MockDecoder::new().with_audio(vec![0i16; 16000], 1, 16000);
        let normalizer =
            AudioNormalizer::new(Arc::new(decoder), 16000, temp_dir.path().to_path_buf());
        let service = Arc::new(DiarizationService::new(
            store,
            ProviderSet::mock(),
            normalizer,
            temp_dir.path().to_path_buf(),
        ));
        let shutdown = Arc::new(Notify::new());
        let handler = DaemonCommandHandler::new(service, Arc::clone(&shutdown));
        Fixture {
            handler,
            shutdown,
            temp_dir,
        }
    }

    #[tokio::test]
    async fn test_handler_submit_and_poll_status() {
        let f = fixture();
        let upload = f.temp_dir.path().join("call.wav");
        std::fs::write(&upload, b"fake audio bytes").unwrap();

        let response = f
            .handler
            .handle(Command::Submit {
                path: upload.to_string_lossy().into_owned(),
            })
            .await;

        let job_id = match response {
            Response::Submitted { job_id, status } => {
                assert_eq!(status, JobStatus::Queued);
                job_id
            }
            other => panic!("Expected Submitted, got {:?}", other),
        };

        // Poll until the mock pipeline finishes.
        for _ in 0..200 {
            let response = f.handler.handle(Command::Status { job_id: job_id.clone() }).await;
            if let Response::Status { job } = &response
                && job.status.is_terminal()
            {
                assert_eq!(job.status, JobStatus::Completed);
                assert!(job.result.is_some());
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job never reached a terminal state");
    }

    #[tokio::test]
    async fn test_handler_submit_missing_file() {
        let f = fixture();
        let response = f
            .handler
            .handle(Command::Submit {
                path: "/nonexistent/call.wav".to_string(),
            })
            .await;

        match response {
            Response::Error { message } => assert!(message.contains("Failed to read")),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_submit_unsupported_extension() {
        let f = fixture();
        let upload = f.temp_dir.path().join("notes.txt");
        std::fs::write(&upload, b"text").unwrap();

        let response = f
            .handler
            .handle(Command::Submit {
                path: upload.to_string_lossy().into_owned(),
            })
            .await;

        match response {
            Response::Error { message } => assert!(message.contains("Unsupported file format")),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_status_unknown_job() {
        let f = fixture();
        let response = f
            .handler
            .handle(Command::Status {
                job_id: "missing".to_string(),
            })
            .await;

        match response {
            Response::Error { message } => assert!(message.contains("Job not found")),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_delete_unknown_job() {
        let f = fixture();
        let response = f
            .handler
            .handle(Command::Delete {
                job_id: "missing".to_string(),
            })
            .await;

        assert!(matches!(response, Response::Error { .. }));
    }

    #[tokio::test]
    async fn test_handler_health() {
        let f = fixture();
        let response = f.handler.handle(Command::Health).await;

        match response {
            Response::Health { report } => {
                assert!(report.providers_ready);
                assert_eq!(report.providers.len(), 3);
            }
            other => panic!("Expected Health, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_shutdown_notifies() {
        let f = fixture();

        let notified = f.shutdown.notified();
        let response = f.handler.handle(Command::Shutdown).await;
        assert!(matches!(response, Response::ShuttingDown));

        // The notification must have been queued.
        tokio::time::timeout(Duration::from_millis(100), notified)
            .await
            .expect("shutdown was not notified");
    }
}
