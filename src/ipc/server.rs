//! Async Unix socket IPC server for daemon control.

use crate::error::{DiaristError, Result};
use crate::ipc::protocol::{Command, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;

/// Handler trait for processing IPC commands.
#[async_trait::async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handle a command and return a response.
    async fn handle(&self, command: Command) -> Response;
}

/// State for managing server shutdown.
#[derive(Debug, Clone)]
struct ServerState {
    shutdown: Arc<Mutex<bool>>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            shutdown: Arc::new(Mutex::new(false)),
        }
    }

    async fn is_shutdown(&self) -> bool {
        *self.shutdown.lock().await
    }

    async fn set_shutdown(&self) {
        *self.shutdown.lock().await = true;
    }
}

/// IPC server for handling daemon control commands via Unix socket.
pub struct IpcServer {
    socket_path: PathBuf,
    state: ServerState,
}

impl IpcServer {
    /// Create a new IPC server bound to the specified socket path.
    pub fn new(socket_path: PathBuf) -> Result<Self> {
        Ok(Self {
            socket_path,
            state: ServerState::new(),
        })
    }

    /// Get the socket path this server is using.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Get the default socket path based on XDG_RUNTIME_DIR or fallback.
    pub fn default_socket_path() -> PathBuf {
        if let Ok(xdg_runtime) = std::env::var("XDG_RUNTIME_DIR") {
            PathBuf::from(xdg_runtime).join("diarist.sock")
        } else {
            let uid = unsafe { libc::getuid() };
            PathBuf::from(format!("/tmp/diarist-{}.sock", uid))
        }
    }

    /// Start the IPC server and handle incoming connections.
    pub async fn start<H>(&self, handler: H) -> Result<()>
    where
        H: CommandHandler + 'static,
    {
        // Clean up any existing socket file
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(|e| DiaristError::IpcSocket {
                message: format!("Failed to remove existing socket: {}", e),
            })?;
        }

        // Bind to the socket
        let listener =
            UnixListener::bind(&self.socket_path).map_err(|e| DiaristError::IpcSocket {
                message: format!("Failed to bind to socket: {}", e),
            })?;

        let handler = Arc::new(handler);

        loop {
            // Check if shutdown was requested
            if self.state.is_shutdown().await {
                break;
            }

            // Accept connection with timeout to check for shutdown
            let accept_result =
                tokio::time::timeout(tokio::time::Duration::from_millis(100), listener.accept())
                    .await;

            match accept_result {
                Ok(Ok((stream, _))) => {
                    let handler = Arc::clone(&handler);
                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, handler).await {
                            log::warn!("error handling IPC client: {}", e);
                        }
                    });
                }
                Ok(Err(e)) => {
                    return Err(DiaristError::IpcConnection {
                        message: format!("Failed to accept connection: {}", e),
                    });
                }
                Err(_) => {
                    // Timeout - check shutdown flag again
                    continue;
                }
            }
        }

        Ok(())
    }

    /// Stop the IPC server and clean up the socket file.
    pub async fn stop(&self) -> Result<()> {
        self.state.set_shutdown().await;

        // Clean up socket file
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(|e| DiaristError::IpcSocket {
                message: format!("Failed to remove socket file: {}", e),
            })?;
        }

        Ok(())
    }
}

/// Handle a single client connection.
async fn handle_client<H>(stream: UnixStream, handler: Arc<H>) -> Result<()>
where
    H: CommandHandler,
{
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    // Read command (one line JSON)
    reader
        .read_line(&mut line)
        .await
        .map_err(|e| DiaristError::IpcConnection {
            message: format!("Failed to read from client: {}", e),
        })?;

    // Parse command
    let command = Command::from_json(line.trim()).map_err(|e| DiaristError::IpcProtocol {
        message: format!("Failed to parse command: {}", e),
    })?;

    // Handle command
    let response = handler.handle(command).await;

    // Send response
    let response_json = response.to_json().map_err(|e| DiaristError::IpcProtocol {
        message: format!("Failed to serialize response: {}", e),
    })?;

    writer
        .write_all(response_json.as_bytes())
        .await
        .map_err(|e| DiaristError::IpcConnection {
            message: format!("Failed to write to client: {}", e),
        })?;

    writer
        .write_all(b"\n")
        .await
        .map_err(|e| DiaristError::IpcConnection {
            message: format!("Failed to write newline to client: {}", e),
        })?;

    writer
        .flush()
        .await
        .map_err(|e| DiaristError::IpcConnection {
            message: format!("Failed to flush writer: {}", e),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Mock handler for testing
    struct MockCommandHandler;

    #[async_trait::async_trait]
    impl CommandHandler for MockCommandHandler {
        async fn handle(&self, command: Command) -> Response {
            match command {
                Command::Health => Response::Health {
                    report: crate::service::HealthReport {
                        providers: vec![],
                        providers_ready: true,
                        active_jobs: 0,
                    },
                },
                Command::Submit { .. } => Response::Submitted {
                    job_id: "test-job".to_string(),
                    status: crate::job::JobStatus::Queued,
                },
                Command::Delete { .. } => Response::Deleted,
                Command::Status { job_id } => Response::Error {
                    message: format!("Job not found: {}", job_id),
                },
                Command::Shutdown => Response::ShuttingDown,
            }
        }
    }

    #[test]
    fn test_default_socket_path_returns_valid_path() {
        let path = IpcServer::default_socket_path();
        let path_str = path.to_string_lossy();
        if std::env::var("XDG_RUNTIME_DIR").is_ok() {
            assert!(
                path_str.ends_with("diarist.sock"),
                "With XDG_RUNTIME_DIR, expected path ending with diarist.sock, got: {:?}",
                path
            );
        } else {
            let uid = unsafe { libc::getuid() };
            let expected = format!("/tmp/diarist-{}.sock", uid);
            assert_eq!(path_str, expected);
        }
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("test.sock");

        let server = IpcServer::new(socket_path.clone()).unwrap();
        assert_eq!(server.socket_path(), socket_path);
    }

    #[tokio::test]
    async fn test_server_start_and_stop() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("test.sock");

        let server = Arc::new(IpcServer::new(socket_path.clone()).unwrap());
        let server_clone = Arc::clone(&server);
        let handle = tokio::spawn(async move { server_clone.start(MockCommandHandler).await });

        // Give the server time to bind
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        assert!(socket_path.exists());

        server.stop().await.unwrap();
        handle.await.unwrap().unwrap();
        assert!(!socket_path.exists());
    }

    #[tokio::test]
    async fn test_server_handles_command() {
        let temp_dir = TempDir::new().unwrap();
        let socket_path = temp_dir.path().join("test.sock");

        let server = Arc::new(IpcServer::new(socket_path.clone()).unwrap());
        let server_clone = Arc::clone(&server);
        let handle = tokio::spawn(async move { server_clone.start(MockCommandHandler).await });

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let response = crate::ipc::client::send_command(&socket_path, Command::Health)
            .await
            .unwrap();
        assert!(matches!(response, Response::Health { .. }));

        server.stop().await.unwrap();
        handle.await.unwrap().unwrap();
    }
}
