use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::{
    history::{HistoryError, RunHistoryStore},
    io::file::write_atomically,
    models::run_record::{RunHistory, RunRecord},
    report::ReportPublisher,
};

/// Run history kept as a single pretty-printed JSON array on disk.
///
/// Every append reads the whole file, adds one record and rewrites the whole
/// file, then republishes the report through the owned [`ReportPublisher`].
///
/// There is no file locking: two processes appending at the same time can
/// lose an update.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    publisher: ReportPublisher,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, publisher: ReportPublisher) -> Self {
        Self {
            path: path.into(),
            publisher,
        }
    }

    fn persist(&self, history: &RunHistory) -> Result<(), HistoryError> {
        let mut json = serde_json::to_string_pretty(history).map_err(HistoryError::Serialize)?;
        json.push('\n');

        write_atomically(&self.path, json.as_bytes()).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl RunHistoryStore for JsonFileStore {
    fn load(&self) -> Result<RunHistory, HistoryError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no run history yet");
                return Ok(RunHistory::new());
            }
            Err(source) => {
                return Err(HistoryError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&text).map_err(|source| HistoryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn append(&self, description: &str, output: &str) -> Result<RunRecord, HistoryError> {
        // The template is a required input: fail before touching the history.
        let template = self.publisher.load_template()?;

        let mut history = self.load()?;
        let record = RunRecord::stamped(description, output);
        history.push(record.clone());

        self.persist(&history)?;
        info!(path = %self.path.display(), runs = history.len(), "run logged");

        self.publisher.publish(&history, &template)?;
        Ok(record)
    }
}
