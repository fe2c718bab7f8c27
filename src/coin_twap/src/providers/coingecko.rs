//! CoinGecko REST provider.
//!
//! Uses the public `/coins/{id}/ohlc` endpoint. An API key is optional; when
//! one is configured it is sent in the header matching the account tier.

pub mod params;
pub mod provider;
pub mod response;

pub use params::ApiTier;
pub use provider::CoinGeckoProvider;
