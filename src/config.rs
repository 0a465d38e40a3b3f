//! Configuration loading.
//!
//! Everything has a default, so the config file is optional. A YAML file can
//! override any subset of fields, and a few environment variables override
//! the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{BudgetForm, CategoryRule, PeriodType};

/// Overrides `api.base_url`.
pub const ENV_API_BASE_URL: &str = "FINBOARD_API_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// File the configuration was read from; `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Where the assistant API lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds before a request is abandoned
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sent along with chat messages when set
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_id: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// CSV or JSON file to seed the session from; the demo dataset otherwise
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
    /// Symbol used when printing amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Checked before the built-in merchant rules
    #[serde(default)]
    pub category_rules: Vec<CategoryRule>,
    #[serde(default)]
    pub budgets: Vec<BudgetConfig>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            seed_file: None,
            currency_symbol: default_currency_symbol(),
            category_rules: Vec::new(),
            budgets: Vec::new(),
        }
    }
}

/// A budget set up at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub category: String,
    /// In currency units, e.g. 500 or 249.99
    pub limit: f64,
    #[serde(default)]
    pub period: PeriodType,
}

impl BudgetConfig {
    pub fn to_form(&self) -> BudgetForm {
        BudgetForm {
            category: self.category.clone(),
            limit: self.limit.to_string(),
            period: self.period.to_string(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Config {
    /// Load `path` if it exists, fall back to defaults if it doesn't, then
    /// apply environment overrides. Runs before logging is set up, so it
    /// records where it came from in `source` instead of logging.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let mut config = Self::from_yaml(&content)?;
            config.source = Some(path.to_path_buf());
            config
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides looked up through `lookup` (the process environment
    /// in production).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base_url.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api.base_url.as_str();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                base
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ledger.currency_symbol, "$");
        assert!(config.ledger.seed_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("api:\n  timeout_secs: 5\nledger:\n  currency_symbol: \"AED \"\n").unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.ledger.currency_symbol, "AED ");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("").unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env(|key| (key == ENV_API_BASE_URL).then(|| "https://api.example.com".to_string()));
        assert_eq!(config.api.base_url, "https://api.example.com");
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "127.0.0.1:8000".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rules_and_budgets() {
        let config = Config::from_yaml(
            "ledger:\n  category_rules:\n    - pattern: \"^GYM\"\n      category: Health\n  budgets:\n    - category: Food\n      limit: 249.99\n    - category: Transport\n      limit: 75\n      period: weekly\n",
        )
        .unwrap();

        assert_eq!(config.ledger.category_rules, vec![CategoryRule::new("^GYM", "Health")]);
        assert_eq!(config.ledger.budgets.len(), 2);
        assert_eq!(config.ledger.budgets[0].period, PeriodType::Monthly);

        let food = config.ledger.budgets[0].to_form().into_budget().unwrap();
        assert_eq!(food.limit, 24999);
        let transport = config.ledger.budgets[1].to_form().into_budget().unwrap();
        assert_eq!(transport.period, PeriodType::Weekly);
        assert_eq!(transport.limit, 7500);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.source, None);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finboard.yaml");
        std::fs::write(&path, "logging:\n  level: debug\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }
}
