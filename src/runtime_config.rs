// =============================================================================
// Runtime Configuration — oscillator parameters with atomic save
// =============================================================================
//
// Every tunable parameter of the TMO pipeline lives here. There are no
// process-wide defaults: the moving-average mode and the category tag are
// ordinary fields passed through to the pipeline and the output bundle.
//
// All fields carry `#[serde(default)]` so that a partial (or empty) JSON file
// loads with the standard 14 / 5 / 3 setup.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::TmoError;
use crate::types::{FillPolicy, MaMode};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_length() -> usize {
    14
}

fn default_calc_length() -> usize {
    5
}

fn default_smooth_length() -> usize {
    3
}

fn default_fused_epsilon() -> f64 {
    1e-9
}

fn default_category() -> String {
    "momentum".to_string()
}

// =============================================================================
// TmoConfig
// =============================================================================

/// Parameters for one True Momentum Oscillator computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmoConfig {
    // --- Windows ------------------------------------------------------------

    /// Primary window: number of sign values summed per bar.
    #[serde(default = "default_length")]
    pub length: usize,

    /// Secondary window: smoothing span applied to the raw sum.
    #[serde(default = "default_calc_length")]
    pub calc_length: usize,

    /// Tertiary window: span of the main and smooth signal stages, and the
    /// momentum lag.
    #[serde(default = "default_smooth_length")]
    pub smooth_length: usize,

    /// Moving-average family used for every smoothing stage.
    #[serde(default)]
    pub mamode: MaMode,

    // --- Feature flags ------------------------------------------------------

    /// Emit momentum-of-signal series. When off they are zero-filled.
    #[serde(default)]
    pub compute_momentum: bool,

    /// Rescale the raw sum to [-100, 100]. Generic path only.
    #[serde(default)]
    pub normalize_signal: bool,

    /// Use the fused sum+EMA kernel when `mamode` is ema.
    #[serde(default = "default_true")]
    pub fused_kernel: bool,

    /// Relative mass below which the fused kernel's geometric tail is cut.
    #[serde(default = "default_fused_epsilon")]
    pub fused_epsilon: f64,

    // --- Post-processing ----------------------------------------------------

    /// Bars to shift every output series (positive = later).
    #[serde(default)]
    pub offset: i64,

    /// Treatment of undefined values after the shift.
    #[serde(default)]
    pub fill: FillPolicy,

    /// Category tag carried on the output bundle.
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for TmoConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            calc_length: default_calc_length(),
            smooth_length: default_smooth_length(),
            mamode: MaMode::Ema,
            compute_momentum: false,
            normalize_signal: false,
            fused_kernel: true,
            fused_epsilon: default_fused_epsilon(),
            offset: 0,
            fill: FillPolicy::None,
            category: default_category(),
        }
    }
}

impl TmoConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read tmo config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse tmo config from {}", path.display()))?;

        info!(
            path = %path.display(),
            name = %config.name(),
            mamode = %config.mamode,
            "tmo config loaded"
        );

        Ok(config)
    }

    /// Like [`TmoConfig::load`], but a missing file yields the defaults.
    ///
    /// Any other failure (unreadable or malformed file) is returned, so a
    /// broken config never silently turns into the 14 / 5 / 3 setup.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>().map(|io| io.kind())
                    == Some(std::io::ErrorKind::NotFound) =>
            {
                warn!(path = %path.display(), "tmo config not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise tmo config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "tmo config saved (atomic)");
        Ok(())
    }

    /// Check the window lengths and the fused-kernel tolerance.
    ///
    /// The normalize/fused conflict is checked when the pipeline resolves
    /// its strategy, since it depends on `mamode` as well.
    pub fn validate(&self) -> crate::error::Result<()> {
        for (field, value) in [
            ("length", self.length),
            ("calc_length", self.calc_length),
            ("smooth_length", self.smooth_length),
        ] {
            if value == 0 {
                return Err(TmoError::invalid_config(field, "must be a positive integer"));
            }
        }
        if !(self.fused_epsilon > 0.0 && self.fused_epsilon < 1.0) {
            return Err(TmoError::invalid_config(
                "fused_epsilon",
                format!("must lie in (0, 1), got {}", self.fused_epsilon),
            ));
        }
        Ok(())
    }

    /// Bundle identifier, e.g. `TMO_14_5_3`.
    pub fn name(&self) -> String {
        format!(
            "TMO_{}_{}_{}",
            self.length, self.calc_length, self.smooth_length
        )
    }

    /// Bars of history required before the pipeline may run.
    pub fn required_history(&self) -> usize {
        self.length.max(self.calc_length).max(self.smooth_length)
    }
}
