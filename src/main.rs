use anyhow::Result;
use clap::Parser;
use diarist::cli::{Cli, Commands};
use diarist::config::Config;
use diarist::daemon::run_daemon;
use diarist::ipc::client::send_command;
use diarist::ipc::protocol::{Command, Response};
use diarist::ipc::server::IpcServer;
use diarist::job::JobSnapshot;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let socket_path = cli
        .socket
        .clone()
        .unwrap_or_else(IpcServer::default_socket_path);

    match cli.command {
        Commands::Daemon => {
            let config = load_config(cli.config.as_deref())?;
            run_daemon(config, Some(socket_path), cli.quiet).await?;
        }
        Commands::Submit { file } => {
            let path = file.canonicalize().map_err(|e| {
                anyhow::anyhow!("Cannot read {}: {}", file.display(), e)
            })?;
            let response = send_command(
                &socket_path,
                Command::Submit {
                    path: path.to_string_lossy().into_owned(),
                },
            )
            .await?;
            match expect_ok(response)? {
                Response::Submitted { job_id, status } => {
                    println!("Job {} {}", job_id, status);
                }
                other => anyhow::bail!("Unexpected daemon response: {:?}", other),
            }
        }
        Commands::Status { job_id } => {
            let response = send_command(&socket_path, Command::Status { job_id }).await?;
            match expect_ok(response)? {
                Response::Status { job } => print_job(&job),
                other => anyhow::bail!("Unexpected daemon response: {:?}", other),
            }
        }
        Commands::Delete { job_id } => {
            let response =
                send_command(&socket_path, Command::Delete { job_id: job_id.clone() }).await?;
            match expect_ok(response)? {
                Response::Deleted => println!("Job {} deleted", job_id),
                other => anyhow::bail!("Unexpected daemon response: {:?}", other),
            }
        }
        Commands::Health => {
            let response = send_command(&socket_path, Command::Health).await?;
            match expect_ok(response)? {
                Response::Health { report } => {
                    println!(
                        "Status: {}",
                        if report.providers_ready {
                            "healthy"
                        } else {
                            "degraded"
                        }
                    );
                    for provider in &report.providers {
                        println!(
                            "  {}: {}",
                            provider.name,
                            if provider.ready { "ready" } else { "not ready" }
                        );
                    }
                    println!("Active jobs: {}", report.active_jobs);
                }
                other => anyhow::bail!("Unexpected daemon response: {:?}", other),
            }
        }
        Commands::Shutdown => {
            let response = send_command(&socket_path, Command::Shutdown).await?;
            match expect_ok(response)? {
                Response::ShuttingDown => println!("Daemon shutting down"),
                other => anyhow::bail!("Unexpected daemon response: {:?}", other),
            }
        }
    }

    Ok(())
}

/// Turn a daemon-side error response into a client error.
fn expect_ok(response: Response) -> Result<Response> {
    match response {
        Response::Error { message } => anyhow::bail!("{}", message),
        other => Ok(other),
    }
}

fn print_job(job: &JobSnapshot) {
    println!(
        "Job {}: {} ({:.0}%)",
        job.job_id,
        job.status,
        job.progress * 100.0
    );

    if let Some(error) = &job.error {
        println!("Error: {}", error);
    }

    if let Some(result) = &job.result {
        println!(
            "Audio: {:.2}s, {} speaker(s), processed in {:.2}s",
            result.audio_duration, result.total_speakers, result.processing_time
        );
        if !result.transcript.is_empty() {
            println!("\n{}", result.transcript);
        }
        if !result.speakers.is_empty() {
            println!("\nSpeaker statistics:");
            for (speaker, stats) in &result.speakers {
                println!(
                    "  {}: {:.2}s ({:.1}%), {} turn(s), {} word(s)",
                    speaker,
                    stats.total_duration,
                    stats.percentage,
                    stats.segment_count,
                    stats.word_count
                );
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);
    Ok(Config::load_or_default(&path)?.with_env_overrides())
}
