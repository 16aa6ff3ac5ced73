//! Environment-derived runtime configuration.
//!
//! Deployment targets configure the service through environment
//! variables rather than a config file:
//! - `STATUSBOOK_ARTIFACT`: default workbook URL or path, used when a
//!   request does not carry its own.
//! - `STATUSBOOK_CADENCE`: `weekly` (default) or `biweekly`.

use crate::types::Cadence;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Default artifact source (URL or local path).
    pub artifact_source: Option<String>,
    pub cadence: Cadence,
}

impl Config {
    pub fn from_env() -> Self {
        let artifact_source = std::env::var("STATUSBOOK_ARTIFACT")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let cadence = std::env::var("STATUSBOOK_CADENCE")
            .map(|s| Cadence::parse(&s))
            .unwrap_or_default();
        Config {
            artifact_source,
            cadence,
        }
    }
}
