use serde::{Deserialize, Serialize};

/// Parameters for requesting OHLC candles from a market data provider.
///
/// Values are passed through to the provider unmodified; no validation of the
/// currency code against a supported set is performed here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcRequestParams {
    /// Provider-specific asset identifier (e.g. `"bitcoin"`, `"ethereum"`).
    pub coin_id: String,

    /// Quote currency code (e.g. `"usd"`, `"eur"`).
    pub currency: String,

    /// Lookback window length in days.
    pub days: u32,
}

impl OhlcRequestParams {
    pub fn new(coin_id: impl Into<String>, currency: impl Into<String>, days: u32) -> Self {
        Self {
            coin_id: coin_id.into(),
            currency: currency.into(),
            days,
        }
    }
}
