// =============================================================================
// Signal — an ordered f64 series with NaN as the "undefined" marker
// =============================================================================
//
// Every stage of the pipeline consumes and produces a `Signal` of the same
// length as the price input. Warm-up bars and gaps are represented by NaN,
// which serialises to JSON `null`.

use std::ops::Index;

use serde::Serialize;

/// An ordered series of real values aligned to the price index.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Signal(Vec<f64>);

impl Signal {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// A signal of `len` undefined values.
    pub fn undefined(len: usize) -> Self {
        Self(vec![f64::NAN; len])
    }

    /// A signal of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Re-align a valid-window result to the full input length by prepending
    /// `len - values.len()` undefined values.
    pub fn prepend_undefined(values: Vec<f64>, len: usize) -> Self {
        if values.len() >= len {
            return Self(values);
        }
        let mut out = Vec::with_capacity(len);
        out.resize(len - values.len(), f64::NAN);
        out.extend(values);
        Self(out)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Value at `i` if it exists and is defined.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied().filter(|v| !v.is_nan())
    }

    /// Index of the first defined value.
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(|v| !v.is_nan())
    }

    /// Number of defined values.
    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|v| !v.is_nan()).count()
    }

    /// Most recent value, `None` when the last bar is undefined.
    pub fn last(&self) -> Option<f64> {
        self.0.last().copied().filter(|v| !v.is_nan())
    }

    /// Apply `f` to every defined value, leaving undefined values in place.
    pub fn map_defined(mut self, f: impl Fn(f64) -> f64) -> Self {
        for v in self.0.iter_mut().filter(|v| !v.is_nan()) {
            *v = f(*v);
        }
        self
    }
}

/// Element-wise equality where two undefined values compare equal.
impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| (a.is_nan() && b.is_nan()) || a == b)
    }
}

impl From<Vec<f64>> for Signal {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Index<usize> for Signal {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl<'a> IntoIterator for &'a Signal {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_realigns_valid_output() {
        let s = Signal::prepend_undefined(vec![1.0, 2.0], 4);
        assert_eq!(s.len(), 4);
        assert!(s[0].is_nan() && s[1].is_nan());
        assert_eq!(s.get(2), Some(1.0));
        assert_eq!(s.first_defined(), Some(2));
    }

    #[test]
    fn prepend_with_empty_output_is_all_undefined() {
        let s = Signal::prepend_undefined(Vec::new(), 3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.defined_count(), 0);
        assert_eq!(s.last(), None);
    }

    #[test]
    fn map_defined_skips_nan() {
        let s = Signal::new(vec![f64::NAN, 2.0, -1.0]).map_defined(|v| v * 10.0);
        assert!(s[0].is_nan());
        assert_eq!(s.get(1), Some(20.0));
        assert_eq!(s.get(2), Some(-10.0));
    }

    #[test]
    fn undefined_values_compare_equal() {
        let s = Signal::new(vec![f64::NAN, 1.0]);
        assert_eq!(s, s.clone());
        assert_eq!(Signal::undefined(3), Signal::undefined(3));
    }

    #[test]
    fn equality_still_checks_values_and_length() {
        let s = Signal::new(vec![f64::NAN, 1.0]);
        assert_ne!(s, Signal::new(vec![f64::NAN, 2.0]));
        assert_ne!(s, Signal::new(vec![0.0, 1.0]));
        assert_ne!(s, Signal::new(vec![f64::NAN, 1.0, 1.0]));
    }

    #[test]
    fn serialises_nan_as_null() {
        let s = Signal::new(vec![f64::NAN, 1.5]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[null,1.5]");
    }
}
