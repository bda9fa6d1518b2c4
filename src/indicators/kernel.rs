// =============================================================================
// Kernel Fusion — rolling sum + EMA as a single FIR convolution
// =============================================================================
//
// The generic path computes
//
//   sum_t = Σ_{j=0}^{L-1} sign_{t-j}
//   ema_t = α · sum_t + (1 - α) · ema_{t-1},      α = 2 / (J + 1)
//
// Both stages are linear and time-invariant, so their composition is a
// convolution of the sign series with (ones_L * e), where e[k] = α·r^k and
// r = 1 - α:
//
//   k[n] = α · Σ_{m=0}^{n} r^{n-m}            0 <= n <  L
//   k[n] = k[L-1] · r^{n-L+1}                 n >= L
//
// The geometric tail is cut once the remaining mass drops below
// `epsilon · L` (the infinite kernel sums to exactly L). The truncated kernel
// is applied with valid-window alignment, so the fused output starts at
// index taps-1 rather than at the two-stage warm-up of L + J - 2. The fused
// path has no SMA seed; after the EMA seed transient has decayed both paths
// agree to within the truncation error.
// =============================================================================

use tracing::debug;

use crate::signal::Signal;

/// A causal FIR kernel. `weights[0]` applies to the newest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
}

impl Kernel {
    /// All-ones kernel of width `window`: the rolling sum as a convolution.
    pub fn ones(window: usize) -> Self {
        Self {
            weights: vec![1.0; window],
        }
    }

    /// Fused kernel for "sum of the last `window` values, then EMA(`span`)".
    pub fn fused_sum_ema(window: usize, span: usize, epsilon: f64) -> Self {
        if window == 0 || span == 0 {
            return Self { weights: Vec::new() };
        }

        let alpha = 2.0 / (span as f64 + 1.0);
        let decay = 1.0 - alpha;

        let mut weights = Vec::with_capacity(window);
        // acc_n = Σ_{m=0}^{n} r^{n-m} = acc_{n-1}·r + 1
        let mut acc = 0.0;
        for _ in 0..window {
            acc = acc * decay + 1.0;
            weights.push(alpha * acc);
        }

        let mut w = weights[window - 1];
        let mut tail_mass = if decay > 0.0 {
            w * decay / (1.0 - decay)
        } else {
            0.0
        };
        let cutoff = epsilon * window as f64;
        while tail_mass > cutoff {
            w *= decay;
            weights.push(w);
            tail_mass *= decay;
        }

        debug!(window, span, taps = weights.len(), "fused sum+ema kernel built");
        Self { weights }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Valid convolution: one output per full window, aligned to the last
    /// input of each window. Returns `input.len() - len() + 1` values, or an
    /// empty vec when the input is shorter than the kernel.
    pub fn convolve_valid(&self, input: &[f64]) -> Vec<f64> {
        let width = self.weights.len();
        if width == 0 || input.len() < width {
            return Vec::new();
        }

        (width - 1..input.len())
            .map(|t| {
                self.weights
                    .iter()
                    .enumerate()
                    .map(|(n, w)| w * input[t - n])
                    .sum::<f64>()
            })
            .collect()
    }

    /// Convolve and re-align to the input index with a leading undefined run.
    pub fn apply(&self, input: &Signal) -> Signal {
        Signal::prepend_undefined(self.convolve_valid(input.as_slice()), input.len())
    }
}
