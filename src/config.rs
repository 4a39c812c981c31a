use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::retry::{Classifier, InvalidArgument, RetryPolicy};

/// Retry parameters as they appear in a host program's TOML config.
///
/// Missing keys fall back to the defaults (3 attempts, 1 second apart). The
/// classifier is code, not data, so it is supplied when turning the config
/// into a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay between attempts in seconds (e.g. 0.25 = 250ms).
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 1.0,
        }
    }
}

impl RetryConfig {
    /// Parse from a TOML document whose top-level keys are the retry settings.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    /// Parse the `[section]` table of a larger TOML document.
    /// A missing section yields the defaults.
    pub fn from_toml_section(data: &str, section: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(data)?;
        match table.remove(section) {
            Some(value) => value
                .try_into::<Self>()
                .with_context(|| format!("invalid [{}] table", section)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading retry config {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn delay(&self) -> Result<Duration, InvalidArgument> {
        Duration::try_from_secs_f64(self.delay_secs).map_err(|_| InvalidArgument::Delay {
            secs: self.delay_secs,
        })
    }

    /// Validate and build a policy with the given classifier.
    pub fn into_policy<E>(
        self,
        classifier: Classifier<E>,
    ) -> Result<RetryPolicy<E>, InvalidArgument> {
        let delay = self.delay()?;
        RetryPolicy::new(self.max_attempts, delay, classifier)
    }
}
