use crate::domain::error::{AppError, Result};
use crate::domain::push_config::PushConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "POWERBI_";
pub const DEFAULT_CONFIG_FILE: &str = "powerpush.toml";

/// Layers defaults, an optional TOML file, `POWERBI_*` variables and
/// caller overrides into a `PushConfig`.
pub struct ConfigService {
    config_file: Option<PathBuf>,
    load_dotenv: bool,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_dotenv: true,
        }
    }

    /// Use an explicit TOML file instead of `powerpush.toml` in the working directory.
    pub fn with_config_file(mut self, path: Option<&Path>) -> Self {
        self.config_file = path.map(Path::to_path_buf);
        self
    }

    #[cfg(test)]
    pub fn with_dotenv(mut self, enabled: bool) -> Self {
        self.load_dotenv = enabled;
        self
    }

    fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(PushConfig::default()));

        match &self.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::ConfigurationError(format!(
                        "Config file {} does not exist",
                        path.display()
                    )));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_file = Path::new(DEFAULT_CONFIG_FILE);
                if default_file.exists() {
                    figment = figment.merge(Toml::file(default_file));
                }
            }
        }

        // POWERBI_TENANT_ID -> tenant_id, POWERBI_WORKSPACE_ID -> workspace_id, ...
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load the configuration. `overrides` only replaces fields it actually sets
    /// (see [`ConfigOverrides`]).
    pub fn load(&self, overrides: &ConfigOverrides) -> Result<PushConfig> {
        if self.load_dotenv {
            match dotenvy::dotenv() {
                Ok(path) => debug!(path = %path.display(), "Loaded .env"),
                Err(e) if e.not_found() => {}
                Err(e) => {
                    return Err(AppError::ConfigurationError(format!(
                        "Failed to read .env: {}",
                        e
                    )))
                }
            }
        }

        let base: PushConfig = self
            .figment()?
            .extract()
            .map_err(|e| AppError::ConfigurationError(e.to_string()))?;

        Ok(overrides.apply(base))
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Command-line values that win over every other layer.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub source_path: Option<PathBuf>,
    pub sheet: Option<String>,
    pub workspace_id: Option<String>,
    pub dataset_name: Option<String>,
    pub table_name: Option<String>,
    pub no_report: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, mut config: PushConfig) -> PushConfig {
        if let Some(path) = &self.source_path {
            config.source_path = Some(path.clone());
        }
        if let Some(sheet) = &self.sheet {
            config.sheet = Some(sheet.clone());
        }
        if let Some(workspace) = &self.workspace_id {
            config.workspace_id = Some(workspace.clone());
        }
        if let Some(name) = &self.dataset_name {
            config.dataset_name = name.clone();
        }
        if let Some(name) = &self.table_name {
            config.table_name = name.clone();
        }
        if self.no_report {
            config.clone_report = false;
        }
        config
    }
}
