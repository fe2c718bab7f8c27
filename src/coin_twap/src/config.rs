//! Application configuration: file locations and provider settings.
//!
//! Configuration is optional. Without a file every setting takes its default,
//! which reproduces the classic layout in the working directory:
//! `runs.json`, `README.template.md` and `README.md`.
//!
//! ```toml
//! [files]
//! history = "runs.json"
//! template = "README.template.md"
//! report = "README.md"
//!
//! [provider]
//! base_url = "https://api.coingecko.com/api/v3"
//! tier = "demo"
//! api_key_env = "COINGECKO_API_KEY"
//! timeout_secs = 30
//! ```
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`AppConfig::from_toml_str`]
//! - Parse + validate from a file path: [`AppConfig::load_path`]
//! - Optional path, defaults when absent: [`AppConfig::load`]

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::providers::coingecko::ApiTier;

pub const DEFAULT_HISTORY_FILE: &str = "runs.json";
pub const DEFAULT_TEMPLATE_FILE: &str = "README.template.md";
pub const DEFAULT_REPORT_FILE: &str = "README.md";
pub const DEFAULT_API_KEY_ENV: &str = "COINGECKO_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub files: FilesConfig,
    pub provider: ProviderConfig,
}

/// Where the run history, the report template and the report live.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// JSON run log.
    pub history: PathBuf,
    /// Report template; must exist and is never written to.
    pub template: PathBuf,
    /// Generated report; overwritten on every logged run.
    pub report: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            history: PathBuf::from(DEFAULT_HISTORY_FILE),
            template: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            report: PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

/// CoinGecko client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Overrides the tier's default base URL.
    pub base_url: Option<String>,
    pub tier: ApiTier,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            tier: ApiTier::default(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// The configured base URL, or the tier's default.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.tier.default_base_url())
    }
}

impl AppConfig {
    /// Checks invariants serde cannot express.
    ///
    /// Errors:
    /// - empty history, template or report path
    /// - report path equal to the template path (the template would be overwritten)
    /// - history path equal to the report or template path
    pub fn validate(&self) -> anyhow::Result<()> {
        let files = &self.files;
        for (name, path) in [
            ("history", &files.history),
            ("template", &files.template),
            ("report", &files.report),
        ] {
            if path.as_os_str().is_empty() {
                bail!("files.{name} cannot be empty");
            }
        }
        if files.report == files.template {
            bail!(
                "files.report and files.template both point to {}; the template must not be overwritten",
                files.report.display()
            );
        }
        for (name, other) in [("report", &files.report), ("template", &files.template)] {
            if files.history == *other {
                bail!(
                    "files.history and files.{name} both point to {}; the history needs its own file",
                    files.history.display()
                );
            }
        }
        if self.provider.api_key_env.trim().is_empty() {
            bail!("provider.api_key_env cannot be empty");
        }
        Ok(())
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(toml_str).context("failed to parse config TOML")?;
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }

    /// Read a configuration file from disk, parse and validate it.
    pub fn load_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("load config file {}", path.display()))
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_path(path),
            None => Ok(Self::default()),
        }
    }
}
