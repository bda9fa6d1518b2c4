// =============================================================================
// TMO Engine — True Momentum Oscillator over open/close price pairs
// =============================================================================
//
// The oscillator sums the sign of each candle body over a window, smooths it
// in stages and optionally adds momentum terms. With the default exponential
// smoothing the sum and the first smoothing stage are fused into one FIR
// convolution.

pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod postprocess;
pub mod runtime_config;
pub mod signal;
pub mod types;

pub use error::{Result, TmoError};
pub use indicators::moving_average::{MovingAverage, StandardMovingAverage};
pub use pipeline::{OutputBundle, Strategy, TmoPipeline};
pub use runtime_config::TmoConfig;
pub use signal::Signal;
pub use types::{Candle, FillPolicy, MaMode, PriceSeries};
