// =============================================================================
// Post-processing — offset shift and fill policy
// =============================================================================
//
// Applied uniformly to every series of one pipeline run:
//
//   1. shift by `offset` bars (positive = later, vacated slots undefined)
//   2. fill undefined values per `FillPolicy`
//
// The default policy leaves undefined values alone. Warm-up bars are
// undefined because there is not enough history, and zero-filling them
// would be indistinguishable from a genuine zero reading.
// =============================================================================

use crate::signal::Signal;
use crate::types::FillPolicy;

/// Shift values along the index. `offset > 0` delays values, `offset < 0`
/// advances them; vacated slots become undefined.
pub fn shift(input: Signal, offset: i64) -> Signal {
    if offset == 0 {
        return input;
    }

    let x = input.into_inner();
    let n = x.len();
    let k = offset.unsigned_abs().min(n as u64) as usize;
    let mut out = vec![f64::NAN; n];
    if offset > 0 {
        out[k..].copy_from_slice(&x[..n - k]);
    } else {
        out[..n - k].copy_from_slice(&x[k..]);
    }
    Signal::new(out)
}

/// Replace undefined values according to `policy`.
pub fn fill(mut input: Signal, policy: FillPolicy) -> Signal {
    let x = input.as_mut_slice();
    match policy {
        FillPolicy::None => {}
        FillPolicy::Value(value) => {
            for v in x.iter_mut().filter(|v| v.is_nan()) {
                *v = value;
            }
        }
        FillPolicy::Forward => {
            let mut last = f64::NAN;
            for v in x.iter_mut() {
                if v.is_nan() {
                    *v = last;
                } else {
                    last = *v;
                }
            }
        }
        FillPolicy::Backward => {
            let mut next = f64::NAN;
            for v in x.iter_mut().rev() {
                if v.is_nan() {
                    *v = next;
                } else {
                    next = *v;
                }
            }
        }
    }
    input
}

/// Shift then fill a single series.
pub fn post_process(input: Signal, offset: i64, policy: FillPolicy) -> Signal {
    fill(shift(input, offset), policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(n: usize) -> Signal {
        Signal::new(vec![1.0; n])
    }

    fn same(a: &Signal, b: &Signal) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
    }

    #[test]
    fn shift_positive_and_negative() {
        let s = shift(ones(5), 2);
        assert!(s[0].is_nan() && s[1].is_nan());
        assert_eq!(&s.as_slice()[2..], &[1.0, 1.0, 1.0]);

        let s = shift(ones(5), -2);
        assert_eq!(&s.as_slice()[..3], &[1.0, 1.0, 1.0]);
        assert!(s[3].is_nan() && s[4].is_nan());
    }

    #[test]
    fn shift_zero_is_noop() {
        let s = Signal::new(vec![f64::NAN, 1.0, 2.0]);
        assert!(same(&shift(s.clone(), 0), &s));
    }

    #[test]
    fn shift_beyond_length_is_all_undefined() {
        let s = shift(ones(3), 7);
        assert_eq!(s.len(), 3);
        assert_eq!(s.defined_count(), 0);
        assert_eq!(shift(ones(3), -7).defined_count(), 0);
    }

    #[test]
    fn shift_then_unshift_restores_defined_region() {
        let s = Signal::new(vec![f64::NAN, f64::NAN, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let restored = shift(shift(s.clone(), 2), -2);
        // Values pushed past the end are lost; the rest come back in place.
        for i in 0..5 {
            assert!(
                (s[i].is_nan() && restored[i].is_nan()) || s[i] == restored[i],
                "index {i}"
            );
        }

        let restored = shift(shift(s.clone(), -2), 2);
        for i in 2..7 {
            assert_eq!(s[i], restored[i]);
        }
    }

    #[test]
    fn constant_fill_zeroes_warmup() {
        let s = fill(Signal::new(vec![f64::NAN, f64::NAN, 3.0]), FillPolicy::Value(0.0));
        assert_eq!(s.as_slice(), &[0.0, 0.0, 3.0]);
    }

    #[test]
    fn forward_fill_keeps_undefined_prefix() {
        let s = fill(
            Signal::new(vec![f64::NAN, 1.0, f64::NAN, f64::NAN, 4.0]),
            FillPolicy::Forward,
        );
        assert!(s[0].is_nan());
        assert_eq!(&s.as_slice()[1..], &[1.0, 1.0, 1.0, 4.0]);
    }

    #[test]
    fn backward_fill_pulls_next_value() {
        let s = fill(
            Signal::new(vec![f64::NAN, 2.0, f64::NAN, 5.0, f64::NAN]),
            FillPolicy::Backward,
        );
        assert_eq!(&s.as_slice()[..4], &[2.0, 2.0, 5.0, 5.0]);
        assert!(s[4].is_nan());
    }

    #[test]
    fn no_policy_leaves_undefined() {
        let s = Signal::new(vec![f64::NAN, 1.0]);
        assert!(same(&post_process(s.clone(), 0, FillPolicy::None), &s));
    }

    #[test]
    fn post_process_shifts_before_filling() {
        let s = post_process(Signal::new(vec![1.0, 2.0, 3.0]), 1, FillPolicy::Value(-1.0));
        assert_eq!(s.as_slice(), &[-1.0, 1.0, 2.0]);
    }
}
