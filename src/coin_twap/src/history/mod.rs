//! Run history persistence.
//!
//! This module defines the [`RunHistoryStore`] trait, the interface the run
//! flow uses to record logged invocations. The store is handed to the caller
//! explicitly; nothing in the crate reaches for a history file on its own.
//!
//! Appending is a single operation from the caller's point of view: the record
//! is persisted *and* the report is regenerated before `append` returns, and a
//! failure in either step fails the whole call.
//!
//! The file-backed implementation lives in [`json_file`].

pub mod json_file;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::{
    models::run_record::{RunHistory, RunRecord},
    report::ReportError,
};

pub use json_file::JsonFileStore;

/// Append-only log of past runs.
pub trait RunHistoryStore {
    /// Reads the whole history. A store with no persisted state yet returns an
    /// empty history.
    fn load(&self) -> Result<RunHistory, HistoryError>;

    /// Appends a new record, stamped with the current UTC time, persists the
    /// updated history and refreshes the report. Returns the new record.
    fn append(&self, description: &str, output: &str) -> Result<RunRecord, HistoryError>;
}

/// Errors that can occur while reading or updating the run history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The history file exists but could not be read.
    #[error("Failed to read run history {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The history file exists but is not a valid run log. It is left as is.
    #[error("Run history {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize run history: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Writing the updated history failed; the previous file is untouched.
    #[error("Failed to write run history {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The report could not be regenerated.
    #[error(transparent)]
    Report(#[from] ReportError),
}
