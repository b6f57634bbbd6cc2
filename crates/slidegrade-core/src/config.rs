//! Grading configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scorer::UnverifiableCredit;

/// Top-level slidegrade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Credit for checks that can only confirm plausibility.
    #[serde(default)]
    pub unverifiable_credit: UnverifiableCredit,
    /// Max documents graded concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Per-document time limit; a timeout marks the document invalid.
    #[serde(default)]
    pub document_timeout_secs: Option<u64>,
    /// Rewrite authoring-tool parameter names before detection.
    #[serde(default = "default_true")]
    pub normalize_parameter_keys: bool,
}

fn default_parallelism() -> usize {
    4
}
fn default_true() -> bool {
    true
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            unverifiable_credit: UnverifiableCredit::default(),
            parallelism: default_parallelism(),
            document_timeout_secs: None,
            normalize_parameter_keys: true,
        }
    }
}

impl GradingConfig {
    pub fn document_timeout(&self) -> Option<Duration> {
        self.document_timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `slidegrade.toml` in the current directory
/// 2. `~/.config/slidegrade/config.toml`
///
/// Environment variable overrides: `SLIDEGRADE_PARALLELISM`,
/// `SLIDEGRADE_DOCUMENT_TIMEOUT_SECS`.
pub fn load_config() -> Result<GradingConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradingConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("slidegrade.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GradingConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradingConfig::default(),
    };

    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply `SLIDEGRADE_*` overrides looked up through `var`.
fn apply_overrides(
    mut config: GradingConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<GradingConfig> {
    if let Some(v) = var("SLIDEGRADE_PARALLELISM") {
        config.parallelism = v
            .trim()
            .parse()
            .with_context(|| format!("invalid SLIDEGRADE_PARALLELISM: {v}"))?;
    }
    if let Some(v) = var("SLIDEGRADE_DOCUMENT_TIMEOUT_SECS") {
        config.document_timeout_secs = Some(
            v.trim()
                .parse()
                .with_context(|| format!("invalid SLIDEGRADE_DOCUMENT_TIMEOUT_SECS: {v}"))?,
        );
    }
    config.parallelism = config.parallelism.max(1);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("slidegrade"))
}
