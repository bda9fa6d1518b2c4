// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free building blocks of the True Momentum Oscillator.
// Every function takes and returns a full-length `Signal`; insufficient
// history shows up as undefined (NaN) bars rather than as an error.

pub mod kernel;
pub mod momentum;
pub mod moving_average;
pub mod rolling_sum;
pub mod sign;
