//! # Pipeline Configuration
//!
//! Layered: defaults, then an optional JSON file, then `BLUEPRINT_*`
//! environment variables. The CLI applies its flags last.

use crate::models::{LlmProvider, ModelConfig};
use crate::tools::DEFAULT_COMMAND_TIMEOUT;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the optional config file
pub const DEFAULT_CONFIG_PATH: &str = ".blueprint/config.json";

/// Directory generated files land in, relative to the working directory
pub const DEFAULT_PROJECT_DIR: &str = "generated_project";

/// Resolved settings for one run. Files on disk use the flat
/// [`ConfigOverrides`] shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Root all generated files are confined to
    pub project_root: PathBuf,
    /// Model used by every stage
    pub model: ModelConfig,
    /// Default `run_cmd` timeout in seconds
    pub command_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from(DEFAULT_PROJECT_DIR),
            model: ModelConfig::default(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
        }
    }
}

/// Partial config from a file, the environment or CLI flags; `None` keeps
/// the current value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub project_root: Option<PathBuf>,
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub command_timeout_secs: Option<u64>,
}

impl PipelineConfig {
    /// Defaults, overlaid with `path` (or [`DEFAULT_CONFIG_PATH`] if it
    /// exists), overlaid with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                default.exists().then_some(default)
            }
        };
        if let Some(file) = file {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read config file: {:?}", file))?;
            config.merge_json(&content)
                .with_context(|| format!("Invalid config file: {:?}", file))?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    fn merge_json(&mut self, content: &str) -> Result<()> {
        let file: ConfigOverrides = serde_json::from_str(content)?;
        self.merge(file);
        Ok(())
    }

    pub fn merge(&mut self, other: ConfigOverrides) {
        if let Some(root) = other.project_root {
            self.project_root = root;
        }
        if let Some(provider) = other.provider {
            // Switching provider without naming a model picks that provider's default
            if other.model.is_none() && provider != self.model.provider {
                self.model.model = provider.default_model().to_string();
            }
            self.model.provider = provider;
        }
        if let Some(model) = other.model {
            self.model.model = model;
        }
        if other.base_url.is_some() {
            self.model.base_url = other.base_url;
        }
        if let Some(secs) = other.command_timeout_secs {
            self.command_timeout_secs = secs;
        }
    }

    /// Apply `BLUEPRINT_*` variables using `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = lookup("BLUEPRINT_PROVIDER")
            .map(|p| p.parse::<LlmProvider>())
            .transpose()?;
        let command_timeout_secs = lookup("BLUEPRINT_COMMAND_TIMEOUT")
            .map(|t| {
                t.trim()
                    .parse::<u64>()
                    .with_context(|| format!("BLUEPRINT_COMMAND_TIMEOUT is not a number: {t}"))
            })
            .transpose()?;

        self.merge(ConfigOverrides {
            project_root: lookup("BLUEPRINT_PROJECT_ROOT").map(PathBuf::from),
            provider,
            model: lookup("BLUEPRINT_MODEL"),
            base_url: lookup("BLUEPRINT_BASE_URL"),
            command_timeout_secs,
        });
        Ok(())
    }
}
