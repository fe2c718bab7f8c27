use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_optional_env_var;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    config::ProviderConfig,
    models::{candle::Candle, request_params::OhlcRequestParams},
    providers::{
        ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, InvalidBaseUrlSnafu, ProviderError,
        ProviderInitError, ReqwestSnafu,
        coingecko::{
            params::{construct_query, ohlc_url},
            response::interpret_response,
        },
    },
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct CoinGeckoProvider {
    client: Client,
    base_url: Url,
    _api_key: Option<SecretString>,
}

impl CoinGeckoProvider {
    /// Creates a provider for the public API with default settings.
    ///
    /// Reads an optional API key from the `COINGECKO_API_KEY` environment
    /// variable.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::from_config(&ProviderConfig::default())
    }

    /// Creates a provider from explicit settings.
    ///
    /// The API key, if any, is read from the environment variable named by
    /// `config.api_key_env`. A missing or empty variable means anonymous
    /// access.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderInitError> {
        let raw_url = config.base_url();
        let base_url = Url::parse(raw_url).map_err(|e| {
            InvalidBaseUrlSnafu {
                url: raw_url,
                message: e.to_string(),
            }
            .build()
        })?;
        if base_url.cannot_be_a_base() {
            return InvalidBaseUrlSnafu {
                url: raw_url,
                message: "URL cannot carry a path",
            }
            .fail();
        }

        let api_key = get_optional_env_var(&config.api_key_env).map(|k| SecretString::new(k.into()));

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(key) = &api_key {
            let mut value =
                header::HeaderValue::from_str(key.expose_secret()).context(InvalidApiKeySnafu)?;
            value.set_sensitive(true);
            headers.insert(config.tier.api_key_header(), value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context(ClientBuildSnafu)?;

        debug!(
            base_url = %base_url,
            tier = ?config.tier,
            authenticated = api_key.is_some(),
            "CoinGecko provider ready"
        );

        Ok(Self {
            client,
            base_url,
            _api_key: api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl DataProvider for CoinGeckoProvider {
    async fn fetch_ohlc(&self, params: OhlcRequestParams) -> Result<Vec<Candle>, ProviderError> {
        let url = ohlc_url(&self.base_url, &params.coin_id)?;
        debug!(%url, currency = %params.currency, days = params.days, "requesting OHLC candles");

        let response = self
            .client
            .get(url)
            .query(&construct_query(&params))
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        let candles = interpret_response(status.as_u16(), &body, &params.coin_id)?;

        info!(coin_id = %params.coin_id, candles = candles.len(), "fetched OHLC candles");
        Ok(candles)
    }
}
