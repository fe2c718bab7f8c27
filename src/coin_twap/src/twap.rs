//! Time-weighted average price over a set of OHLC candles.
//!
//! The average here is the plain arithmetic mean of every open, high, low and
//! close value of every candle. Candle durations are not taken into account:
//! each of the four fields of each candle carries the same weight.

use crate::models::candle::Candle;

/// Computes the TWAP of `candles`.
///
/// Returns `None` when `candles` is empty. Callers are expected to handle the
/// empty case before getting here; the `Option` only keeps the division total.
///
/// Values are summed in ascending order, so the result does not depend on the
/// order of the input candles.
pub fn compute_twap(candles: &[Candle]) -> Option<f64> {
    if candles.is_empty() {
        return None;
    }

    let mut values: Vec<f64> = candles.iter().flat_map(Candle::prices).collect();
    values.sort_by(f64::total_cmp);

    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}
