//! Command-line interface for diarist
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Speaker diarization job service
#[derive(Parser, Debug)]
#[command(name = "diarist", version, about = "Speaker diarization job service")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Unix socket path for daemon IPC
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the diarization daemon
    Daemon,
    /// Submit an audio file for diarization
    Submit {
        /// Audio file to process (.mp3, .wav, .m4a, .flac)
        file: PathBuf,
    },
    /// Check the status of a job
    Status {
        /// Job identifier returned at submission
        job_id: String,
    },
    /// Delete a job record
    Delete {
        /// Job identifier returned at submission
        job_id: String,
    },
    /// Show daemon health
    Health,
    /// Ask the daemon to shut down
    Shutdown,
}
