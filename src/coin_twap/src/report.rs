//! Markdown report of past runs.
//!
//! The report is fully derived from a template file and the current
//! [`RunHistory`]: the literal token [`RUNS_TABLE_PLACEHOLDER`] in the template
//! is replaced by a table of every run, oldest first. The token has to appear
//! exactly as written; if it does not, the template is written out unchanged.
//!
//! [`render_report`] is the pure part. [`ReportPublisher`] owns the file paths,
//! loads the template and writes the report. The template is only ever read.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::{io::file::write_atomically, models::run_record::RunHistory};

/// Token in the template that is replaced with the runs table.
pub const RUNS_TABLE_PLACEHOLDER: &str = "<!-- RUNS_TABLE -->";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised while loading the template or writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The template is a required input; there is no fallback content.
    #[error("Required template file {} not found", path.display())]
    MissingTemplate { path: PathBuf },

    #[error("Failed to read template {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write report {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Escapes characters that would otherwise split a Markdown table cell.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Builds the runs table, one row per record in history order.
pub fn render_runs_table(history: &RunHistory) -> String {
    let mut table = String::from("## Past Runs\n\n");
    table.push_str("| Description | Timestamp (UTC) | Output |\n");
    table.push_str("|-------------|----------------|--------|\n");

    for record in history {
        let timestamp = record.timestamp().format(TIMESTAMP_FORMAT);
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(record.description()),
            timestamp,
            escape_cell(record.output()),
        ));
    }

    table
}

/// Substitutes the runs table for [`RUNS_TABLE_PLACEHOLDER`] in `template`.
pub fn render_report(history: &RunHistory, template: &str) -> String {
    if !template.contains(RUNS_TABLE_PLACEHOLDER) {
        warn!(
            placeholder = RUNS_TABLE_PLACEHOLDER,
            "template has no runs table placeholder; report will not list any runs"
        );
    }
    template.replace(RUNS_TABLE_PLACEHOLDER, &render_runs_table(history))
}

/// Reads the report template and writes the rendered report.
#[derive(Debug, Clone)]
pub struct ReportPublisher {
    template_path: PathBuf,
    report_path: PathBuf,
}

impl ReportPublisher {
    pub fn new(template_path: impl Into<PathBuf>, report_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            report_path: report_path.into(),
        }
    }

    /// Reads the template, failing with [`ReportError::MissingTemplate`] if it
    /// does not exist.
    pub fn load_template(&self) -> Result<String, ReportError> {
        match fs::read_to_string(&self.template_path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ReportError::MissingTemplate {
                path: self.template_path.clone(),
            }),
            Err(source) => Err(ReportError::Read {
                path: self.template_path.clone(),
                source,
            }),
        }
    }

    /// Renders the report for `history` from the template on disk.
    pub fn render(&self, history: &RunHistory) -> Result<String, ReportError> {
        let template = self.load_template()?;
        Ok(render_report(history, &template))
    }

    /// Renders `history` into `template` and replaces the report file with the
    /// result. The write goes through a temporary file in the same directory,
    /// so the previous report stays intact if anything fails.
    pub fn publish(&self, history: &RunHistory, template: &str) -> Result<(), ReportError> {
        let content = render_report(history, template);
        write_atomically(&self.report_path, content.as_bytes()).map_err(|source| {
            ReportError::Write {
                path: self.report_path.clone(),
                source,
            }
        })?;
        info!(path = %self.report_path.display(), runs = history.len(), "report written");
        Ok(())
    }
}
