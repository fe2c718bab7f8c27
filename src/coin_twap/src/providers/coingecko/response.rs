use serde::Deserialize;
use snafu::ResultExt;

use crate::{
    models::candle::Candle,
    providers::{ApiSnafu, DecodeSnafu, NotFoundSnafu, ProviderError},
};

/// One row of the OHLC endpoint: `[timestamp_ms, open, high, low, close]`.
#[derive(Deserialize, Debug)]
pub struct OhlcRow(pub i64, pub f64, pub f64, pub f64, pub f64);

impl From<OhlcRow> for Candle {
    fn from(OhlcRow(timestamp, open, high, low, close): OhlcRow) -> Self {
        Candle::new(timestamp, open, high, low, close)
    }
}

/// Error payloads CoinGecko is known to return.
///
/// Unknown coins yield `{"error": "coin not found"}`; rate limiting and key
/// problems yield `{"status": {"error_code": .., "error_message": ".."}}`.
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    error: Option<String>,
    status: Option<ErrorStatus>,
}

#[derive(Deserialize, Debug)]
struct ErrorStatus {
    error_message: Option<String>,
}

/// Parses a successful OHLC response into candles.
pub fn parse_ohlc_body(body: &str) -> Result<Vec<Candle>, ProviderError> {
    let rows: Vec<OhlcRow> = serde_json::from_str(body).context(DecodeSnafu)?;
    Ok(rows.into_iter().map(Candle::from).collect())
}

/// Best-effort human-readable message from an error response body.
pub fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .or_else(|| parsed.status.and_then(|s| s.error_message))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown API error".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

/// Compatibility check for providers that only report unknown coins in text.
pub fn mentions_coin_not_found(message: &str) -> bool {
    message.to_lowercase().contains("coin not found")
}

/// Maps a non-success response to a [`ProviderError`].
///
/// HTTP 404 from the OHLC endpoint means the coin id is unknown. Any other
/// status is an API error, unless its message says the coin was not found.
pub fn classify_failure(status: u16, body: &str, coin_id: &str) -> ProviderError {
    let message = error_message(body);
    if status == 404 || mentions_coin_not_found(&message) {
        NotFoundSnafu { coin_id }.build()
    } else {
        ApiSnafu { status, message }.build()
    }
}

/// Turns a raw OHLC response into candles or a classified error.
///
/// A success status whose body is not an OHLC array but says the coin was not
/// found is still [`ProviderError::NotFound`].
pub fn interpret_response(
    status: u16,
    body: &str,
    coin_id: &str,
) -> Result<Vec<Candle>, ProviderError> {
    if !(200..300).contains(&status) {
        return Err(classify_failure(status, body, coin_id));
    }

    parse_ohlc_body(body).map_err(|e| {
        if mentions_coin_not_found(body) {
            NotFoundSnafu { coin_id }.build()
        } else {
            e
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ohlc_rows() {
        let body = r#"[
            [1709395200000, 61942, 62211, 61721, 61845],
            [1709396999000, 61845.5, 62000.25, 61800, 61990.75]
        ]"#;
        let candles = parse_ohlc_body(body).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(
            candles[0],
            Candle::new(1709395200000, 61942.0, 62211.0, 61721.0, 61845.0)
        );
        assert_eq!(candles[1].close, 61990.75);
    }

    #[test]
    fn empty_array_is_no_data_not_an_error() {
        assert!(parse_ohlc_body("[]").unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = parse_ohlc_body(r#"{"prices": []}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));

        let err = parse_ohlc_body("[[1, 2, 3]]").unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn http_404_is_not_found() {
        let err = classify_failure(404, r#"{"error":"coin not found"}"#, "notacoin");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Coin ID 'notacoin' not found");
    }

    #[test]
    fn not_found_message_on_other_status_is_still_not_found() {
        let err = classify_failure(400, r#"{"error":"Coin Not Found"}"#, "x");
        assert!(err.is_not_found());
    }

    #[test]
    fn status_error_message_is_extracted() {
        let body = r#"{"status":{"error_code":429,"error_message":"You've exceeded the Rate Limit."}}"#;
        match classify_failure(429, body, "bitcoin") {
            ProviderError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 429);
                assert_eq!(message, "You've exceeded the Rate Limit.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_used_verbatim() {
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(error_message(""), "Unknown API error");
    }

    #[test]
    fn success_status_with_rows_yields_candles() {
        let candles = interpret_response(200, "[[1, 1.0, 2.0, 0.5, 1.5]]", "bitcoin").unwrap();
        assert_eq!(candles, vec![Candle::new(1, 1.0, 2.0, 0.5, 1.5)]);
    }

    #[test]
    fn failure_status_goes_through_classification() {
        assert!(interpret_response(404, "", "nope").unwrap_err().is_not_found());

        let err = interpret_response(500, "upstream down", "bitcoin").unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn success_status_with_not_found_body_is_not_found() {
        let err = interpret_response(200, r#"{"error":"coin not found"}"#, "nope").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Coin ID 'nope' not found");
    }

    #[test]
    fn success_status_with_other_garbage_is_a_decode_error() {
        let err = interpret_response(200, r#"{"unexpected":true}"#, "bitcoin").unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }
}
