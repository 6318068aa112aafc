//! Scheduler configuration structures.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Environment variable holding the concurrency limit.
pub const ENV_CONCURRENCY: &str = "TASK_QUEUE_CONCURRENCY";
/// Environment variable holding the auto-start flag.
pub const ENV_AUTO_START: &str = "TASK_QUEUE_AUTO_START";
/// Environment variable selecting the pending-collection backend.
pub const ENV_BACKEND: &str = "TASK_QUEUE_BACKEND";

/// Pending-collection backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueBackendConfig {
    /// Binary heap keyed by priority and submission order.
    #[default]
    Heap,
    /// List kept sorted on every insertion.
    Sorted,
}

impl FromStr for QueueBackendConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heap" => Ok(Self::Heap),
            "sorted" => Ok(Self::Sorted),
            other => Err(format!("unknown queue backend `{other}`")),
        }
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of tasks in flight at once.
    pub concurrency: usize,
    /// Start admitting immediately; when false the scheduler starts paused.
    pub auto_start: bool,
    /// Pending-collection backend.
    pub backend: QueueBackendConfig,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            auto_start: true,
            backend: QueueBackendConfig::Heap,
        }
    }
}

impl QueueConfig {
    /// Default configuration: concurrency 1, auto-start, heap backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set whether the scheduler starts admitting immediately.
    #[must_use]
    pub const fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Select the pending-collection backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: QueueBackendConfig) -> Self {
        self.backend = backend;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a message when the concurrency limit is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a message on malformed JSON (including negative concurrency)
    /// or failed validation.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `TASK_QUEUE_*` environment variables, after
    /// loading a `.env` file if one is present. Unset variables keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns a message when a variable cannot be parsed or the result fails
    /// validation.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_CONCURRENCY) {
            cfg.concurrency = raw
                .trim()
                .parse()
                .map_err(|e| format!("{ENV_CONCURRENCY}=`{raw}` invalid: {e}"))?;
        }
        if let Some(raw) = lookup(ENV_AUTO_START) {
            cfg.auto_start = parse_flag(&raw)
                .ok_or_else(|| format!("{ENV_AUTO_START}=`{raw}` is not a boolean"))?;
        }
        if let Some(raw) = lookup(ENV_BACKEND) {
            cfg.backend = raw.parse()?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, parsed, or validated.
    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading queue config {}", path.display()))?;
        Self::from_json_str(&raw)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading queue config {}", path.display()))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
