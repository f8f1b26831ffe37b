use crate::domain::strategy::{Strategy, StrategyResolver, StrategyTable};
use crate::error::{BumpError, Result};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name searched for in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "bump-version.toml";

/// Represents the complete configuration for bump-version.
///
/// Strategy names are kept as raw strings here and validated by
/// [`Config::strategy_resolver`], so an unknown name is reported as an
/// invalid strategy rather than a TOML syntax error.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub strategy: Option<String>,

    #[serde(default)]
    pub strategies_by_branch: HashMap<String, String>,

    #[serde(default)]
    pub markers: MarkerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_major_markers() -> Vec<String> {
    vec!["bump-major".to_string()]
}

fn default_minor_markers() -> Vec<String> {
    vec!["bump-minor".to_string()]
}

/// Commit message substrings that force a bump regardless of strategy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MarkerConfig {
    #[serde(default = "default_major_markers")]
    pub major: Vec<String>,

    #[serde(default = "default_minor_markers")]
    pub minor: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            major: default_major_markers(),
            minor: default_minor_markers(),
        }
    }
}

fn default_output_key() -> String {
    "version".to_string()
}

/// Where and under which key the computed version is emitted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_output_key")]
    pub key: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            key: default_output_key(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5_000
}

fn default_multiplier() -> u32 {
    2
}

/// Backoff settings for remote operations.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| BumpError::config(e.to_string()))
    }

    /// Validate strategy names and build the resolver.
    ///
    /// `explicit` and `extra_branches` come from the command line and take
    /// precedence over the file: a non-empty `explicit` replaces `strategy`,
    /// and `extra_branches` entries replace same-named file entries.
    pub fn strategy_resolver(
        &self,
        explicit: Option<&str>,
        extra_branches: Option<&str>,
    ) -> Result<StrategyResolver> {
        let file_strategy = self
            .strategy
            .as_deref()
            .map(str::parse::<Strategy>)
            .transpose()?
            .unwrap_or_default();

        let strategy = match explicit.filter(|s| !s.trim().is_empty()) {
            Some(name) => name.parse::<Strategy>()?,
            None => file_strategy,
        };

        let mut by_branch = StrategyTable::from_names(&self.strategies_by_branch)?;
        if let Some(assignments) = extra_branches {
            by_branch = by_branch.merged_with(&StrategyTable::parse_assignments(assignments)?);
        }

        Ok(StrategyResolver::new(strategy, by_branch))
    }

    /// Backoff policy for remote fetches
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        if self.retry.max_attempts == 0 {
            return Err(BumpError::config("retry.max_attempts must be at least 1"));
        }

        Ok(RetryPolicy {
            max_attempts: self.retry.max_attempts,
            initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
            multiplier: self.retry.multiplier.max(1),
        })
    }
}

/// Locate the configuration file to use, if any.
///
/// Search order:
/// 1. Custom path provided as parameter
/// 2. `bump-version.toml` in the current directory
/// 3. `bump-version.toml` in the user config directory
pub fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match find_config_file(config_path) {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|e| {
                BumpError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&text)
        }
        None => Ok(Config::default()),
    }
}
