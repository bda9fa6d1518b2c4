// =============================================================================
// Moving Averages — the smoothing capability used by every pipeline stage
// =============================================================================
//
// The pipeline only talks to the `MovingAverage` trait. `StandardMovingAverage`
// covers the common families:
//
//   EMA  α = 2 / (n + 1), seeded with the SMA of the first n defined values
//   RMA  α = 1 / n (Wilder), seeded the same way
//   SMA  mean of the trailing n values
//   WMA  Σ (k · x_{t-n+k}) / (n(n+1)/2), k = 1..n, newest bar heaviest
//
// All of them preserve the input length. Leading undefined values are skipped
// and followed by n - 1 warm-up bars. For the recursive modes an undefined
// value after the seed yields an undefined output and leaves the state alone;
// an undefined value inside the seed window restarts seeding.
// =============================================================================

use crate::error::{Result, TmoError};
use crate::indicators::rolling_sum::rolling_sum;
use crate::signal::Signal;
use crate::types::MaMode;

/// Smoothing capability selected by a mode tag.
pub trait MovingAverage {
    /// Smooth `series` over `length` bars. The result has the same length as
    /// the input.
    fn smooth(&self, mode: MaMode, series: &Signal, length: usize) -> Result<Signal>;
}

/// Default adapter supporting every [`MaMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMovingAverage;

impl MovingAverage for StandardMovingAverage {
    fn smooth(&self, mode: MaMode, series: &Signal, length: usize) -> Result<Signal> {
        if length == 0 {
            return Err(TmoError::invalid_config(
                "length",
                format!("{mode} length must be positive"),
            ));
        }
        Ok(match mode {
            MaMode::Ema => ema(series, length),
            MaMode::Rma => rma(series, length),
            MaMode::Sma => sma(series, length),
            MaMode::Wma => wma(series, length),
        })
    }
}

/// Exponential moving average.
pub fn ema(series: &Signal, period: usize) -> Signal {
    recursive_smooth(series, period, 2.0 / (period as f64 + 1.0))
}

/// Wilder's moving average.
pub fn rma(series: &Signal, period: usize) -> Signal {
    recursive_smooth(series, period, 1.0 / period as f64)
}

/// Simple moving average.
pub fn sma(series: &Signal, period: usize) -> Signal {
    let n = period as f64;
    rolling_sum(series, period).map_defined(|v| v / n)
}

/// Linearly weighted moving average.
pub fn wma(series: &Signal, period: usize) -> Signal {
    let x = series.as_slice();
    let mut out = vec![f64::NAN; x.len()];
    if period == 0 || x.len() < period {
        return Signal::new(out);
    }

    let denom = (period * (period + 1)) as f64 / 2.0;
    for t in period - 1..x.len() {
        let window = &x[t + 1 - period..=t];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let weighted: f64 = window
            .iter()
            .enumerate()
            .map(|(k, v)| (k + 1) as f64 * v)
            .sum();
        out[t] = weighted / denom;
    }
    Signal::new(out)
}

/// SMA-seeded first-order recursive filter shared by EMA and RMA.
fn recursive_smooth(series: &Signal, period: usize, alpha: f64) -> Signal {
    let x = series.as_slice();
    let mut out = vec![f64::NAN; x.len()];
    if period == 0 {
        return Signal::new(out);
    }

    let mut seed_sum = 0.0;
    let mut seed_count = 0usize;
    let mut prev: Option<f64> = None;

    for (i, &v) in x.iter().enumerate() {
        if v.is_nan() {
            if prev.is_none() {
                seed_sum = 0.0;
                seed_count = 0;
            }
            continue;
        }

        match prev {
            None => {
                seed_sum += v;
                seed_count += 1;
                if seed_count == period {
                    let seed = seed_sum / period as f64;
                    out[i] = seed;
                    prev = Some(seed);
                }
            }
            Some(p) => {
                let next = alpha * v + (1.0 - alpha) * p;
                out[i] = next;
                prev = Some(next);
            }
        }
    }

    Signal::new(out)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Signal {
        Signal::new((1..=n).map(|i| i as f64).collect())
    }

    // ---- ema -------------------------------------------------------------

    #[test]
    fn ema_known_values() {
        // SMA of first 5 = 3.0, multiplier = 2/6 = 1/3
        let closes = ascending(10);
        let out = ema(&closes, 5);
        assert_eq!(out.len(), 10);
        assert_eq!(out.first_defined(), Some(4));

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        assert!((out[4] - expected).abs() < 1e-10);
        for i in 5..10 {
            expected = closes[i] * mult + expected * (1.0 - mult);
            assert!((out[i] - expected).abs() < 1e-10, "index {i}");
        }
    }

    #[test]
    fn ema_skips_leading_undefined() {
        let mut values = vec![f64::NAN; 13];
        values.extend([2.0, 4.0, 6.0, 8.0]);
        let out = ema(&Signal::new(values), 3);
        assert_eq!(out.first_defined(), Some(15));
        assert!((out[15] - 4.0).abs() < 1e-12);
        assert!((out[16] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn ema_interior_gap_holds_state() {
        let out = ema(&Signal::new(vec![1.0, 1.0, f64::NAN, 4.0]), 2);
        assert_eq!(out.get(1), Some(1.0));
        assert!(out[2].is_nan());
        // α = 2/3: 2/3·4 + 1/3·1 = 3
        assert!((out[3] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn ema_gap_inside_seed_restarts() {
        let out = ema(&Signal::new(vec![1.0, f64::NAN, 5.0, 7.0]), 2);
        assert_eq!(out.first_defined(), Some(3));
        assert!((out[3] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn ema_period_one_is_identity() {
        let s = Signal::new(vec![f64::NAN, 3.0, -2.0, 5.0]);
        let out = ema(&s, 1);
        assert!(out[0].is_nan());
        assert_eq!(&out.as_slice()[1..], &[3.0, -2.0, 5.0]);
    }

    // ---- rma / sma / wma -------------------------------------------------

    #[test]
    fn rma_uses_wilder_alpha() {
        let out = rma(&Signal::new(vec![2.0, 4.0, 10.0]), 2);
        // seed 3.0, then (3·1 + 10) / 2
        assert!((out[1] - 3.0).abs() < 1e-12);
        assert!((out[2] - 6.5).abs() < 1e-12);
    }

    #[test]
    fn sma_known_values() {
        let out = sma(&ascending(6), 3);
        assert!(out[1].is_nan());
        assert_eq!(&out.as_slice()[2..], &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn wma_known_values() {
        // (1·1 + 2·2 + 3·3) / 6
        let out = wma(&ascending(4), 3);
        assert!((out[2] - 14.0 / 6.0).abs() < 1e-12);
        // (1·2 + 2·3 + 3·4) / 6
        assert!((out[3] - 20.0 / 6.0).abs() < 1e-12);
    }

    // ---- adapter ---------------------------------------------------------

    #[test]
    fn adapter_dispatches_by_mode() {
        let s = ascending(20);
        let ma = StandardMovingAverage;
        assert_eq!(ma.smooth(MaMode::Ema, &s, 4).unwrap(), ema(&s, 4));
        assert_eq!(ma.smooth(MaMode::Sma, &s, 4).unwrap(), sma(&s, 4));
        assert_eq!(ma.smooth(MaMode::Wma, &s, 4).unwrap(), wma(&s, 4));
        assert_eq!(ma.smooth(MaMode::Rma, &s, 4).unwrap(), rma(&s, 4));
    }

    #[test]
    fn adapter_rejects_zero_length() {
        let err = StandardMovingAverage
            .smooth(MaMode::Ema, &ascending(5), 0)
            .unwrap_err();
        assert!(matches!(err, TmoError::InvalidConfig { .. }));
    }

    #[test]
    fn every_mode_preserves_length_and_zeros() {
        let zeros = Signal::zeros(30);
        for mode in [MaMode::Ema, MaMode::Sma, MaMode::Wma, MaMode::Rma] {
            let out = StandardMovingAverage.smooth(mode, &zeros, 5).unwrap();
            assert_eq!(out.len(), 30, "{mode}");
            assert!(out.iter().all(|v| v.is_nan() || *v == 0.0), "{mode}");
        }
    }
}
