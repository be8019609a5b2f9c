use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding the four fixture files.
    pub fixture_dir: PathBuf,
    /// Upper bound applied to the `delayMs` chaos parameter.
    pub chaos_max_delay: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            fixture_dir: std::env::var("FIXTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("fixtures")),
            chaos_max_delay: Duration::from_millis(
                std::env::var("CHAOS_MAX_DELAY_MS")
                    .unwrap_or_else(|_| "30000".to_string())
                    .parse()
                    .context("CHAOS_MAX_DELAY_MS must be a whole number of milliseconds")?,
            ),
        })
    }
}
