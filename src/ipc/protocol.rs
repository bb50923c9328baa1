//! JSON message protocol for IPC communication between CLI and daemon.

use crate::job::{JobSnapshot, JobStatus};
use crate::service::HealthReport;
use serde::{Deserialize, Serialize};

/// Commands sent by CLI to the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Submit an audio file for diarization
    Submit { path: String },
    /// Get the status of a job
    Status { job_id: String },
    /// Delete a job record
    Delete { job_id: String },
    /// Get daemon health
    Health,
    /// Shutdown the daemon
    Shutdown,
}

impl Command {
    /// Serialize command to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize command from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Responses sent by daemon to CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Job accepted
    Submitted { job_id: String, status: JobStatus },
    /// Current job snapshot
    Status { job: JobSnapshot },
    /// Job record removed
    Deleted,
    /// Daemon health
    Health { report: HealthReport },
    /// Shutdown acknowledged
    ShuttingDown,
    /// Error occurred
    Error { message: String },
}

impl Response {
    /// Serialize response to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize response from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
