// =============================================================================
// Shared types used across the TMO engine
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Result, TmoError};

/// A single OHLCV candle. Only `open_time`, `open` and `close` feed the
/// oscillator; the remaining fields are accepted so exchange dumps load as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Paired open/close observations with their bar index (open time, millis).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    index: Vec<i64>,
    open: Vec<f64>,
    close: Vec<f64>,
}

impl PriceSeries {
    /// Build a series from explicit columns. All three must have equal length.
    pub fn new(index: Vec<i64>, open: Vec<f64>, close: Vec<f64>) -> Result<Self> {
        if open.len() != close.len() {
            return Err(TmoError::LengthMismatch {
                open: open.len(),
                close: close.len(),
            });
        }
        if index.len() != open.len() {
            return Err(TmoError::LengthMismatch {
                open: open.len(),
                close: index.len(),
            });
        }
        Ok(Self { index, open, close })
    }

    /// Build a series indexed by bar position (0, 1, 2, ...).
    pub fn from_open_close(open: Vec<f64>, close: Vec<f64>) -> Result<Self> {
        let index = (0..open.len() as i64).collect();
        Self::new(index, open, close)
    }

    /// Build a series from candles (oldest first).
    pub fn from_candles(candles: &[Candle]) -> Self {
        Self {
            index: candles.iter().map(|c| c.open_time).collect(),
            open: candles.iter().map(|c| c.open).collect(),
            close: candles.iter().map(|c| c.close).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }
}

/// Moving-average family requested from a [`MovingAverage`] adapter.
///
/// [`MovingAverage`]: crate::indicators::moving_average::MovingAverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaMode {
    /// Exponential, α = 2 / (n + 1). The only mode with a fused path.
    Ema,
    /// Simple arithmetic mean.
    Sma,
    /// Linearly weighted mean, newest bar heaviest.
    Wma,
    /// Wilder's smoothing, α = 1 / n.
    Rma,
}

impl Default for MaMode {
    fn default() -> Self {
        Self::Ema
    }
}

impl std::fmt::Display for MaMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ema => write!(f, "ema"),
            Self::Sma => write!(f, "sma"),
            Self::Wma => write!(f, "wma"),
            Self::Rma => write!(f, "rma"),
        }
    }
}

impl std::str::FromStr for MaMode {
    type Err = TmoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ema" => Ok(Self::Ema),
            "sma" => Ok(Self::Sma),
            "wma" => Ok(Self::Wma),
            "rma" => Ok(Self::Rma),
            other => Err(TmoError::invalid_config(
                "mamode",
                format!("unknown moving average '{other}'"),
            )),
        }
    }
}

/// How undefined values are treated after the offset shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum FillPolicy {
    /// Leave undefined values in place.
    None,
    /// Replace every undefined value with a constant.
    Value(f64),
    /// Carry the last defined value forward.
    Forward,
    /// Pull the next defined value backward.
    Backward,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Value(v) => write!(f, "value({v})"),
            Self::Forward => write!(f, "ffill"),
            Self::Backward => write!(f, "bfill"),
        }
    }
}
