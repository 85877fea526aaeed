//! Session configuration loaded from a TOML file.
//!
//! Every field has a default, so an absent file or a partial one is fine:
//!
//! ```toml
//! freshness_hours = 12
//! debounce_ms = 500
//! api_base_url = "https://api.example.com/v1"
//! academic_categories = ["Mathematics", "Physics"]
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::constants::http::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::models::constants::{
    CACHE_NAMESPACE, DEFAULT_ACADEMIC_CATEGORIES, DEFAULT_DEBOUNCE_MS, DEFAULT_FRESHNESS_HOURS,
    MAX_FRESHNESS_HOURS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Hours a cached panel snapshot stays usable.
    pub freshness_hours: i64,
    /// Idle milliseconds before edits are written to the local cache.
    pub debounce_ms: u64,
    /// Directory of the file-backed cache.
    pub cache_dir: PathBuf,
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    /// Syllabus categories that make a competition academic.
    pub academic_categories: Vec<String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            freshness_hours: DEFAULT_FRESHNESS_HOURS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cache_dir: default_cache_dir(),
            api_base_url: "http://localhost:8080/api".to_string(),
            http_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            academic_categories: DEFAULT_ACADEMIC_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_NAMESPACE)
}

impl WizardConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: WizardConfig = toml::from_str(content).context("Invalid wizard config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_FRESHNESS_HOURS).contains(&self.freshness_hours) {
            bail!(
                "freshness_hours must be between 1 and {MAX_FRESHNESS_HOURS}, got {}",
                self.freshness_hours
            );
        }
        if self.http_timeout_secs == 0 {
            bail!("http_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn freshness(&self) -> Duration {
        let hours = u64::try_from(self.freshness_hours).unwrap_or(0);
        Duration::from_secs(hours.saturating_mul(3600))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
