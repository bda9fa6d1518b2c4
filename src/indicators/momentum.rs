// =============================================================================
// Momentum — first difference over a look-back lag
// =============================================================================
//
//   MOM_t = x_t - x_{t-lag}      for t >= lag, undefined before.
//
// Unlike ROC this is an absolute difference, so it stays meaningful for
// oscillators that cross zero.

use crate::signal::Signal;

/// Difference of each value against the value `lag` bars earlier.
///
/// Undefined when either operand is undefined. A `lag` of zero yields zeros
/// wherever the input is defined.
pub fn momentum(input: &Signal, lag: usize) -> Signal {
    let x = input.as_slice();
    let mut out = vec![f64::NAN; x.len()];
    for i in lag..x.len() {
        out[i] = x[i] - x[i - lag];
    }
    Signal::new(out)
}

/// Most recent momentum value.
pub fn current_momentum(input: &Signal, lag: usize) -> Option<f64> {
    momentum(input, lag).last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_basic() {
        let s = Signal::new((1..=10).map(|x| (x * x) as f64).collect());
        let m = momentum(&s, 3);
        assert_eq!(m.first_defined(), Some(3));
        for i in 3..10 {
            assert_eq!(m[i], s[i] - s[i - 3]);
        }
        // 16 - 1
        assert_eq!(m.get(3), Some(15.0));
    }

    #[test]
    fn undefined_operands_propagate() {
        let s = Signal::new(vec![f64::NAN, 1.0, 2.0, 4.0]);
        let m = momentum(&s, 1);
        assert!(m[0].is_nan());
        assert!(m[1].is_nan());
        assert_eq!(m.get(2), Some(1.0));
        assert_eq!(m.get(3), Some(2.0));
    }

    #[test]
    fn lag_longer_than_series() {
        let m = momentum(&Signal::new(vec![1.0, 2.0]), 5);
        assert_eq!(m.len(), 2);
        assert_eq!(m.defined_count(), 0);
        assert_eq!(current_momentum(&Signal::new(vec![1.0, 2.0]), 5), None);
    }

    #[test]
    fn current_momentum_is_last_value() {
        let s = Signal::new(vec![3.0, 5.0, 4.0, 9.0]);
        assert_eq!(current_momentum(&s, 2), Some(4.0));
    }
}
