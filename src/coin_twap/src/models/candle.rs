//! Canonical in-memory representation of an OHLC candle.
//!
//! This struct is the standard output of every [`DataProvider`](crate::providers::DataProvider)
//! implementation. Candles are consumed once by the TWAP calculation and never persisted.

/// A single OHLC sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Sample timestamp as reported by the provider. The unit and origin are
    /// provider-defined (CoinGecko reports epoch milliseconds) and opaque to
    /// the rest of the crate.
    pub timestamp: i64,

    /// Opening price.
    pub open: f64,

    /// Highest price during the interval.
    pub high: f64,

    /// Lowest price during the interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// The four price fields in OHLC order.
    pub fn prices(&self) -> [f64; 4] {
        [self.open, self.high, self.low, self.close]
    }
}
