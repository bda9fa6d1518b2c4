// =============================================================================
// TMO Engine — Command-line runner
// =============================================================================
//
// Usage: tmo-engine <candles.json>
//
// Reads a JSON array of candles (oldest first), computes the oscillator with
// the configuration from `TMO_CONFIG` (default `tmo_config.json`) and prints
// the output bundle as JSON on stdout. Undefined bars are printed as `null`.
// =============================================================================

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tmo_engine::{Candle, PriceSeries, TmoConfig, TmoPipeline};

fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path =
        std::env::var("TMO_CONFIG").unwrap_or_else(|_| "tmo_config.json".to_string());
    let mut config = TmoConfig::load_or_default(&config_path)?;
    apply_env_overrides(&mut config)?;

    // ── 2. Input candles ─────────────────────────────────────────────────
    let Some(input_path) = std::env::args().nth(1) else {
        bail!("usage: tmo-engine <candles.json>");
    };
    let content = std::fs::read_to_string(&input_path)
        .with_context(|| format!("failed to read candles from {input_path}"))?;
    let candles: Vec<Candle> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse candles from {input_path}"))?;

    if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
        info!(
            bars = candles.len(),
            from = %format_millis(first.open_time),
            to = %format_millis(last.open_time),
            "candles loaded"
        );
    }

    // ── 3. Compute & print ───────────────────────────────────────────────
    let pipeline = TmoPipeline::new(config).context("invalid tmo configuration")?;
    let prices = PriceSeries::from_candles(&candles);
    let bundle = pipeline
        .run(&prices)
        .with_context(|| format!("tmo computation failed for {input_path}"))?;

    for (name, value) in bundle.latest() {
        info!(column = %name, latest = ?value, "latest value");
    }

    let json = serde_json::to_string_pretty(&bundle).context("failed to serialise output")?;
    println!("{json}");
    Ok(())
}

/// Override individual config fields from `TMO_*` environment variables.
fn apply_env_overrides(config: &mut TmoConfig) -> Result<()> {
    for (var, field) in [
        ("TMO_LENGTH", &mut config.length),
        ("TMO_CALC_LENGTH", &mut config.calc_length),
        ("TMO_SMOOTH_LENGTH", &mut config.smooth_length),
    ] {
        if let Ok(raw) = std::env::var(var) {
            *field = raw
                .trim()
                .parse()
                .with_context(|| format!("{var} must be a positive integer, got '{raw}'"))?;
        }
    }
    if let Ok(raw) = std::env::var("TMO_MAMODE") {
        config.mamode = raw.parse().with_context(|| format!("invalid TMO_MAMODE '{raw}'"))?;
    }
    Ok(())
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
