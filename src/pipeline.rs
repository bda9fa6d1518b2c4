// =============================================================================
// TMO Pipeline — orchestrates the oscillator stages
// =============================================================================
//
// Generic:  sign → rolling_sum(L) → [normalize] → MA(J) → MA(K) → MA(K)
// Fused:    sign → fused_kernel(L, J)           →         MA(K) → MA(K)
//
// followed in both cases by the optional momentum stage (lag K) and the
// shift/fill post-processing. The branch is resolved once from the config.
//
//   L = length, J = calc_length, K = smooth_length
// =============================================================================

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, TmoError};
use crate::indicators::kernel::Kernel;
use crate::indicators::momentum::momentum;
use crate::indicators::moving_average::{MovingAverage, StandardMovingAverage};
use crate::indicators::rolling_sum::{normalize, rolling_sum};
use crate::indicators::sign::sign_series;
use crate::postprocess::post_process;
use crate::runtime_config::TmoConfig;
use crate::signal::Signal;
use crate::types::{MaMode, PriceSeries};

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Computation branch for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Rolling sum followed by three moving-average stages.
    Generic,
    /// Fused sum+EMA kernel followed by two moving-average stages.
    Fused,
}

impl Strategy {
    /// Pick the branch for `config`. Normalization needs the raw sum, which
    /// the fused branch never materialises, so that combination is rejected.
    pub fn resolve(config: &TmoConfig) -> Result<Self> {
        let strategy = if config.mamode == MaMode::Ema && config.fused_kernel {
            Self::Fused
        } else {
            Self::Generic
        };

        if strategy == Self::Fused && config.normalize_signal {
            warn!(
                name = %config.name(),
                "normalize_signal requested on the fused ema path"
            );
            return Err(TmoError::invalid_config(
                "normalize_signal",
                "not available with the fused ema kernel; set fused_kernel = false",
            ));
        }

        Ok(strategy)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::Fused => write!(f, "fused"),
        }
    }
}

// ---------------------------------------------------------------------------
// OutputBundle
// ---------------------------------------------------------------------------

/// Named oscillator outputs sharing one index.
#[derive(Debug, Clone, Serialize)]
pub struct OutputBundle {
    /// e.g. `TMO_14_5_3`
    pub name: String,
    pub category: String,
    pub strategy: Strategy,
    pub index: Vec<i64>,
    pub main_signal: Signal,
    pub smooth_signal: Signal,
    pub main_momentum: Signal,
    pub smooth_momentum: Signal,
    #[serde(skip)]
    suffix: String,
}

impl OutputBundle {
    /// Series in fixed order with their column names.
    pub fn columns(&self) -> [(String, &Signal); 4] {
        [
            (format!("TMO_{}", self.suffix), &self.main_signal),
            (format!("TMOs_{}", self.suffix), &self.smooth_signal),
            (format!("TMOM_{}", self.suffix), &self.main_momentum),
            (format!("TMOMs_{}", self.suffix), &self.smooth_momentum),
        ]
    }

    /// Most recent value of each series, by column name.
    pub fn latest(&self) -> Vec<(String, Option<f64>)> {
        self.columns()
            .into_iter()
            .map(|(name, s)| (name, s.last()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

// ---------------------------------------------------------------------------
// History check
// ---------------------------------------------------------------------------

/// Fail when fewer than `required` bars are available.
pub fn verify_history(actual: usize, required: usize) -> Result<()> {
    if actual < required {
        return Err(TmoError::InsufficientHistory { required, actual });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TmoPipeline
// ---------------------------------------------------------------------------

/// True Momentum Oscillator over paired open/close prices.
pub struct TmoPipeline<M = StandardMovingAverage> {
    config: TmoConfig,
    strategy: Strategy,
    ma: M,
}

impl TmoPipeline<StandardMovingAverage> {
    /// Pipeline using the built-in moving averages.
    pub fn new(config: TmoConfig) -> Result<Self> {
        Self::with_moving_average(config, StandardMovingAverage)
    }
}

impl<M: MovingAverage> TmoPipeline<M> {
    /// Pipeline using a caller-supplied smoothing adapter. The fused branch
    /// still builds its first stage from the kernel; `ma` serves every other
    /// smoothing stage.
    pub fn with_moving_average(config: TmoConfig, ma: M) -> Result<Self> {
        config.validate()?;
        let strategy = Strategy::resolve(&config)?;
        debug!(name = %config.name(), %strategy, mamode = %config.mamode, "tmo pipeline configured");
        Ok(Self {
            config,
            strategy,
            ma,
        })
    }

    pub fn config(&self) -> &TmoConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Run every stage over `prices` and assemble the output bundle.
    pub fn run(&self, prices: &PriceSeries) -> Result<OutputBundle> {
        let cfg = &self.config;
        verify_history(prices.len(), cfg.required_history())?;

        let signs = sign_series(prices.open(), prices.close())?;

        let smooth_tmo = match self.strategy {
            Strategy::Generic => {
                let mut raw = rolling_sum(&signs, cfg.length);
                if cfg.normalize_signal {
                    raw = normalize(raw, cfg.length);
                }
                self.ma.smooth(cfg.mamode, &raw, cfg.calc_length)?
            }
            Strategy::Fused => {
                let kernel = Kernel::fused_sum_ema(cfg.length, cfg.calc_length, cfg.fused_epsilon);
                if prices.len() < kernel.len() {
                    warn!(
                        bars = prices.len(),
                        taps = kernel.len(),
                        "input shorter than fused kernel, every output bar is undefined"
                    );
                }
                kernel.apply(&signs)
            }
        };
        debug!(
            strategy = %self.strategy,
            first_defined = ?smooth_tmo.first_defined(),
            "smoothed tmo computed"
        );

        let main_signal = self.ma.smooth(cfg.mamode, &smooth_tmo, cfg.smooth_length)?;
        let smooth_signal = self.ma.smooth(cfg.mamode, &main_signal, cfg.smooth_length)?;

        let (main_momentum, smooth_momentum) = if cfg.compute_momentum {
            (
                momentum(&main_signal, cfg.smooth_length),
                momentum(&smooth_signal, cfg.smooth_length),
            )
        } else {
            (
                Signal::zeros(main_signal.len()),
                Signal::zeros(smooth_signal.len()),
            )
        };

        let finish = |s: Signal| post_process(s, cfg.offset, cfg.fill);
        let bundle = OutputBundle {
            name: cfg.name(),
            category: cfg.category.clone(),
            strategy: self.strategy,
            index: prices.index().to_vec(),
            main_signal: finish(main_signal),
            smooth_signal: finish(smooth_signal),
            main_momentum: finish(main_momentum),
            smooth_momentum: finish(smooth_momentum),
            suffix: format!("{}_{}_{}", cfg.length, cfg.calc_length, cfg.smooth_length),
        };

        info!(
            name = %bundle.name,
            strategy = %bundle.strategy,
            bars = bundle.len(),
            main = ?bundle.main_signal.last(),
            smooth = ?bundle.smooth_signal.last(),
            "tmo computed"
        );

        Ok(bundle)
    }
}
