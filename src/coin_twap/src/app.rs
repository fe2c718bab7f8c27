//! One end-to-end run: fetch, compute, print and optionally log.
//!
//! [`execute`] takes its collaborators explicitly so tests can drive it with a
//! stub provider and a temporary history store. Everything the user sees goes
//! to `out`; the returned [`RunStatus`] decides the process exit code.

use std::io::{self, Write};

use tracing::warn;

use crate::{
    history::RunHistoryStore,
    models::request_params::OhlcRequestParams,
    providers::DataProvider,
    twap::compute_twap,
};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwapRequest {
    pub coin_id: String,
    pub currency: String,
    pub days: u32,
    /// Append the run to the history and regenerate the report.
    pub log: bool,
    /// Used only when `log` is set; see [`TwapRequest::description`].
    pub description: Option<String>,
}

impl TwapRequest {
    pub fn params(&self) -> OhlcRequestParams {
        OhlcRequestParams::new(&self.coin_id, &self.currency, self.days)
    }

    /// The explicit description, or `TWAP calculation for <coin_id>`.
    pub fn description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("TWAP calculation for {}", self.coin_id))
    }

    /// The result line printed and logged for a computed `twap`.
    pub fn output_line(&self, twap: f64) -> String {
        format!(
            "TWAP for {} in {} over {} days: {}",
            self.coin_id,
            self.currency,
            self.days,
            format_price(twap)
        )
    }
}

/// Shortest round-trip rendering of `value`, with exponents written with an
/// explicit sign and at least two digits (`1.23e-05`, `1.5e+16`).
fn format_price(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let debug = format!("{value:?}");
    match debug.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => debug,
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// The provider answered with no candles.
    NoData,
    /// The provider does not know the coin id.
    CoinNotFound,
    /// Any other provider failure.
    ProviderFailed,
    /// The TWAP was computed and printed, but logging the run failed.
    LogFailed,
}

impl RunStatus {
    pub fn is_success(self) -> bool {
        self == RunStatus::Success
    }

    pub fn exit_code(self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Runs `request` against `provider`, writing user-facing lines to `out`.
///
/// `store` is only touched when `request.log` is set, and only after the TWAP
/// has been computed and printed. Errors writing to `out` are the only errors
/// returned; every other failure is reported on `out` and reflected in the
/// returned [`RunStatus`].
pub async fn execute<W: Write>(
    request: &TwapRequest,
    provider: &dyn DataProvider,
    store: &dyn RunHistoryStore,
    out: &mut W,
) -> io::Result<RunStatus> {
    let candles = match provider.fetch_ohlc(request.params()).await {
        Ok(candles) => candles,
        Err(err) if err.is_not_found() => {
            writeln!(out, "Error: Coin ID '{}' not found.", request.coin_id)?;
            return Ok(RunStatus::CoinNotFound);
        }
        Err(err) => {
            warn!(coin_id = %request.coin_id, error = ?err, "provider request failed");
            writeln!(out, "Error: {err}")?;
            return Ok(RunStatus::ProviderFailed);
        }
    };

    let Some(twap) = compute_twap(&candles) else {
        writeln!(out, "No data returned for {}", request.coin_id)?;
        return Ok(RunStatus::NoData);
    };

    let output = request.output_line(twap);
    writeln!(out, "{output}")?;

    if request.log {
        if let Err(err) = store.append(&request.description(), &output) {
            warn!(error = ?err, "logging the run failed");
            writeln!(out, "Error: {err}")?;
            return Ok(RunStatus::LogFailed);
        }
    }

    Ok(RunStatus::Success)
}
