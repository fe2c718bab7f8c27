//! Fetch OHLC candles for a cryptocurrency, compute a TWAP over them and keep
//! a Markdown log of past runs.
//!
//! The pieces, leaf first:
//! - [`providers`]: market data sources behind the [`providers::DataProvider`] trait.
//! - [`twap`]: the average price calculation.
//! - [`history`]: the append-only run log behind [`history::RunHistoryStore`].
//! - [`report`]: renders the run log into a Markdown document from a template.
//! - [`app`]: one end-to-end run, wiring the above together.

pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod history;
pub mod io;
pub mod models;
pub mod providers;
pub mod report;
pub mod twap;
