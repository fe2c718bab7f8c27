#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use coin_twap::{
    history::JsonFileStore,
    models::{candle::Candle, request_params::OhlcRequestParams},
    providers::{ApiSnafu, DataProvider, NotFoundSnafu, ProviderError},
    report::ReportPublisher,
};
use tempfile::TempDir;

pub const TEMPLATE: &str = "# Crypto TWAP\n\nSome intro.\n\n<!-- RUNS_TABLE -->\n\n_generated_\n";

/// History, template and report paths inside a private temp directory.
pub struct Workspace {
    _dir: TempDir, // keep alive for the life of the test
    pub history: PathBuf,
    pub template: PathBuf,
    pub report: PathBuf,
}

impl Workspace {
    /// A workspace with no files in it yet.
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path().to_path_buf();
        Self {
            _dir: dir,
            history: root.join("runs.json"),
            template: root.join("README.template.md"),
            report: root.join("README.md"),
        }
    }

    /// A workspace with [`TEMPLATE`] in place.
    pub fn with_template() -> Self {
        let ws = Self::empty();
        fs::write(&ws.template, TEMPLATE).expect("write template");
        ws
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(
            self.history.clone(),
            ReportPublisher::new(self.template.clone(), self.report.clone()),
        )
    }

    pub fn read_report(&self) -> String {
        fs::read_to_string(&self.report).expect("read report")
    }

    pub fn read_history_json(&self) -> serde_json::Value {
        let text = fs::read_to_string(&self.history).expect("read history");
        serde_json::from_str(&text).expect("history is json")
    }
}

/// Data rows of the rendered runs table.
pub fn table_rows(report: &str) -> Vec<&str> {
    report
        .lines()
        .filter(|l| l.starts_with("| ") && !l.starts_with("| Description"))
        .collect()
}

/// Answers every request with a fixed outcome.
pub enum StubProvider {
    Candles(Vec<Candle>),
    NotFound,
    ApiFailure(&'static str),
}

#[async_trait]
impl DataProvider for StubProvider {
    async fn fetch_ohlc(&self, params: OhlcRequestParams) -> Result<Vec<Candle>, ProviderError> {
        match self {
            StubProvider::Candles(candles) => Ok(candles.clone()),
            StubProvider::NotFound => NotFoundSnafu {
                coin_id: params.coin_id,
            }
            .fail(),
            StubProvider::ApiFailure(message) => ApiSnafu {
                status: 500u16,
                message: *message,
            }
            .fail(),
        }
    }
}

/// The three-candle fixture: twelve values summing to 19.
pub fn three_candles() -> Vec<Candle> {
    vec![
        Candle::new(1, 1.0, 2.0, 0.5, 1.5),
        Candle::new(2, 2.0, 3.0, 1.0, 2.0),
        Candle::new(3, 1.5, 2.5, 0.5, 1.5),
    ]
}
