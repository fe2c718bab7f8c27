use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    models::request_params::OhlcRequestParams,
    providers::{InternalSnafu, ProviderError},
};

/// CoinGecko account tier. Selects the default base URL and the header the
/// API key is sent in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiTier {
    /// Public / demo API (`api.coingecko.com`).
    #[default]
    Demo,
    /// Paid API (`pro-api.coingecko.com`).
    Pro,
}

impl ApiTier {
    pub fn default_base_url(self) -> &'static str {
        match self {
            ApiTier::Demo => "https://api.coingecko.com/api/v3",
            ApiTier::Pro => "https://pro-api.coingecko.com/api/v3",
        }
    }

    pub fn api_key_header(self) -> &'static str {
        match self {
            ApiTier::Demo => "x-cg-demo-api-key",
            ApiTier::Pro => "x-cg-pro-api-key",
        }
    }
}

/// Builds `{base}/coins/{coin_id}/ohlc`, percent-encoding the coin id as a
/// single path segment.
pub fn ohlc_url(base: &Url, coin_id: &str) -> Result<Url, ProviderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            InternalSnafu {
                message: format!("base URL {base} cannot carry a path"),
            }
            .build()
        })?
        .pop_if_empty()
        .extend(["coins", coin_id, "ohlc"]);
    Ok(url)
}

/// Query string for the OHLC endpoint.
pub fn construct_query(params: &OhlcRequestParams) -> Vec<(&'static str, String)> {
    vec![
        ("vs_currency", params.currency.clone()),
        ("days", params.days.to_string()),
    ]
}
