//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the interface the run flow
//! uses to fetch OHLC candles, and the [`ProviderError`] type every provider
//! reports failures with.
//!
//! Failures are classified at the provider boundary: an unknown asset is
//! [`ProviderError::NotFound`], so callers never have to inspect error
//! messages to tell "no such coin" apart from other failures.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use coin_twap::models::{candle::Candle, request_params::OhlcRequestParams};
//! use coin_twap::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_ohlc(
//!         &self,
//!         _params: OhlcRequestParams,
//!     ) -> Result<Vec<Candle>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod coingecko;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{candle::Candle, request_params::OhlcRequestParams};

/// Trait for fetching OHLC candles from a market data provider.
///
/// The trait is async and object safe, so the run flow can take a
/// `&dyn DataProvider` and tests can substitute their own.
#[async_trait]
pub trait DataProvider {
    /// Fetches the candles for `params.coin_id` quoted in `params.currency`
    /// over the last `params.days` days.
    ///
    /// An empty vector is a successful response with no data, not an error.
    async fn fetch_ohlc(&self, params: OhlcRequestParams) -> Result<Vec<Candle>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// The configured base URL cannot be used to build request URLs.
    #[snafu(display("Invalid base URL '{url}': {message}"))]
    InvalidBaseUrl {
        url: String,
        message: String,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// The provider does not know the requested asset.
    #[snafu(display("Coin ID '{coin_id}' not found"))]
    NotFound {
        coin_id: String,
        backtrace: Backtrace,
    },

    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error response.
    #[snafu(display("API error (HTTP {status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The response body did not have the expected shape.
    #[snafu(display("Unexpected response body: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound { .. })
    }
}
