//! Daemon mode for diarist - wires providers, the job service, and the IPC
//! server, then waits for shutdown.

pub mod handler;

use crate::audio::{AudioDecoder, AudioNormalizer, WavDecoder};
use crate::config::{Config, EngineKind};
use crate::error::Result;
use crate::ipc::server::IpcServer;
use crate::job::{InMemoryJobStore, JobStore};
use crate::service::DiarizationService;
use crate::stage::ProviderSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;

/// Run the daemon: wire providers, start the IPC server, wait for shutdown.
///
/// # Arguments
/// * `config` - Configuration
/// * `socket_path` - Path to Unix socket for IPC
/// * `quiet` - Suppress status messages
///
/// # Returns
/// Ok(()) on graceful shutdown, error otherwise
pub async fn run_daemon(config: Config, socket_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let providers = create_providers(&config);

    if !quiet {
        eprintln!(
            "Capability providers ready (model hint '{}', language '{}').",
            config.engine.model, config.engine.language
        );
    }

    let temp_dir = config.temp_dir();
    let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let decoder: Arc<dyn AudioDecoder> = Arc::new(WavDecoder);
    let normalizer = AudioNormalizer::new(decoder, config.audio.sample_rate, temp_dir.clone());
    let service = Arc::new(DiarizationService::new(
        store,
        providers,
        normalizer,
        temp_dir,
    ));

    // Determine socket path
    let socket_path = socket_path.unwrap_or_else(IpcServer::default_socket_path);

    // Create IPC server
    let server = Arc::new(IpcServer::new(socket_path)?);

    if !quiet {
        eprintln!(
            "IPC server listening at: {}",
            server.socket_path().display()
        );
        eprintln!("Daemon ready.");
    }

    // Create command handler with a shutdown notifier
    let shutdown = Arc::new(Notify::new());
    let command_handler = handler::DaemonCommandHandler::new(service, Arc::clone(&shutdown));

    // Start IPC server in background task
    let server_clone = Arc::clone(&server);
    let server_handle = tokio::spawn(async move { server_clone.start(command_handler).await });

    // Wait for SIGTERM, SIGINT, or a shutdown command
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            if !quiet {
                eprintln!("\nReceived SIGINT, shutting down...");
            }
        }
        res = wait_for_sigterm() => {
            if let Err(e) = res {
                log::error!("error setting up signal handler: {}", e);
            }
            if !quiet {
                eprintln!("\nReceived SIGTERM, shutting down...");
            }
        }
        _ = shutdown.notified() => {
            if !quiet {
                eprintln!("Received shutdown command, shutting down...");
            }
        }
    }

    // Stop IPC server
    server.stop().await?;

    // Wait for server task to finish
    if let Err(e) = server_handle.await {
        log::error!("daemon server task failed: {}", e);
    }

    if !quiet {
        eprintln!("Daemon stopped.");
    }

    Ok(())
}

/// Wait for SIGTERM signal (used by systemd).
#[cfg(unix)]
async fn wait_for_sigterm() -> Result<()> {
    use crate::error::DiaristError;
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| DiaristError::Other(format!("Failed to register SIGTERM handler: {}", e)))?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_sigterm() -> Result<()> {
    // On non-Unix, just wait forever (Ctrl+C will still work)
    std::future::pending::<()>().await
}

/// Build the provider set selected by the configuration.
fn create_providers(config: &Config) -> ProviderSet {
    match config.engine.kind {
        EngineKind::Mock => ProviderSet::mock(),
    }
}
