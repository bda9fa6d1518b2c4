// =============================================================================
// Rolling Sum and Normalizer
// =============================================================================
//
// sum_t = Σ x[t-L+1 ..= t]   for t >= L-1, undefined before.
//
// Equivalent to a valid convolution with an all-ones kernel of width L. A
// window that contains an undefined value is itself undefined.
// =============================================================================

use crate::signal::Signal;

/// Trailing-window sum over `window` values.
///
/// The result has the same length as `input`; the first `window - 1` values
/// are undefined. A `window` of zero yields an all-undefined signal.
pub fn rolling_sum(input: &Signal, window: usize) -> Signal {
    let n = input.len();
    if window == 0 || n < window {
        return Signal::undefined(n);
    }

    let x = input.as_slice();
    let mut out = vec![f64::NAN; n];

    // Running sum; `nan_in_window` counts undefined values currently inside.
    let mut sum = 0.0;
    let mut nan_in_window = 0usize;
    for (i, &v) in x.iter().enumerate() {
        if v.is_nan() {
            nan_in_window += 1;
        } else {
            sum += v;
        }

        if i >= window {
            let old = x[i - window];
            if old.is_nan() {
                nan_in_window -= 1;
            } else {
                sum -= old;
            }
        }

        if i + 1 >= window && nan_in_window == 0 {
            out[i] = sum;
        }
    }

    Signal::new(out)
}

/// Rescale a raw sum over `window` bars into the [-100, 100] range.
pub fn normalize(raw: Signal, window: usize) -> Signal {
    let scale = 100.0 / window as f64;
    raw.map_defined(|v| v * scale)
}
