// =============================================================================
// Sign Transform — per-bar direction of the candle body
// =============================================================================
//
//   sign_t = +1  if close_t > open_t
//            -1  if close_t < open_t
//             0  otherwise (including NaN prices)

use crate::error::{Result, TmoError};
use crate::signal::Signal;

/// Convert paired open/close prices into a {-1, 0, +1} sign series.
///
/// Output length equals input length. Fails only when the slices differ in
/// length.
pub fn sign_series(open: &[f64], close: &[f64]) -> Result<Signal> {
    if open.len() != close.len() {
        return Err(TmoError::LengthMismatch {
            open: open.len(),
            close: close.len(),
        });
    }

    let values = open
        .iter()
        .zip(close)
        .map(|(&o, &c)| {
            if c > o {
                1.0
            } else if c < o {
                -1.0
            } else {
                0.0
            }
        })
        .collect();

    Ok(Signal::new(values))
}
