//! Layered configuration loading.
//!
//! Settings are merged from three sources, later sources winning:
//!
//! 1. a TOML settings file (`appsettings.toml` by default, optional)
//! 2. the process environment, after loading a `.env` file if present
//! 3. command-line overrides
//!
//! The environment layer only picks up the variables this program knows
//! about, so unrelated variables never collide with setting names.

use crate::constants::{
    DEFAULT_SETTINGS_FILE, KEY_LOGGING_LEVEL, KEY_QUEUE_NAME, KEY_RUNS_IN_AZURE,
    KEY_SERVICEBUS_NS_NAME, KEY_USER_ASSIGNED_CLIENT_ID, QUEUE_NAME, RUNS_IN_AZURE,
    SB_PUBLIC_SUFFIX, SERVICEBUS_NS_NAME, USER_ASSIGNED_CLIENT_ID,
};
use crate::errors::ConfigError;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

const LOGGING_ENV_PREFIX: &str = "LOGGING__";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    servicebus_ns_name: String,
    #[serde(default)]
    queue_name: String,
    #[serde(default)]
    user_assigned_client_id: Option<String>,
    #[serde(default)]
    runs_in_azure: bool,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: None,
        }
    }
}

/// Values given on the command line. `None` leaves lower layers untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub servicebus_ns_name: Option<String>,
    pub queue_name: Option<String>,
    pub user_assigned_client_id: Option<String>,
    pub runs_in_azure: Option<bool>,
    pub log_level: Option<String>,
}

/// Where the file and environment layers come from.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub settings_file: PathBuf,
    /// A missing file is an error only when it was asked for explicitly.
    pub settings_file_required: bool,
    pub environment: HashMap<String, String>,
}

impl ConfigSources {
    /// Sources for a normal run: the given (or default) settings file and the
    /// process environment.
    pub fn from_process(settings_file: Option<PathBuf>) -> Self {
        dotenv::dotenv().ok();

        let settings_file_required = settings_file.is_some();
        Self {
            settings_file: settings_file.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE)),
            settings_file_required,
            environment: known_environment(std::env::vars()),
        }
    }
}

/// Keeps only the variables that map onto settings.
pub fn known_environment(
    vars: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    vars.into_iter()
        .filter(|(name, _)| {
            matches!(
                name.as_str(),
                SERVICEBUS_NS_NAME | QUEUE_NAME | USER_ASSIGNED_CLIENT_ID | RUNS_IN_AZURE
            ) || name.starts_with(LOGGING_ENV_PREFIX)
        })
        .collect()
}

impl AppConfig {
    /// Loads settings from the process environment and the settings file,
    /// then applies the command-line overrides.
    pub fn load(
        settings_file: Option<PathBuf>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        Self::load_from(ConfigSources::from_process(settings_file), overrides)
    }

    pub fn load_from(
        sources: ConfigSources,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file_source = File::new(&sources.settings_file.to_string_lossy(), FileFormat::Toml)
            .required(sources.settings_file_required);
        // Values stay strings; `config` still coerces "true"/"false" for bool fields
        let env_source = Environment::default()
            .separator("__")
            .source(Some(sources.environment));

        let builder = Config::builder()
            .add_source(file_source)
            .add_source(env_source)
            .set_override_option(KEY_SERVICEBUS_NS_NAME, overrides.servicebus_ns_name.clone())
            .and_then(|b| b.set_override_option(KEY_QUEUE_NAME, overrides.queue_name.clone()))
            .and_then(|b| {
                b.set_override_option(
                    KEY_USER_ASSIGNED_CLIENT_ID,
                    overrides.user_assigned_client_id.clone(),
                )
            })
            .and_then(|b| b.set_override_option(KEY_RUNS_IN_AZURE, overrides.runs_in_azure))
            .and_then(|b| b.set_override_option(KEY_LOGGING_LEVEL, overrides.log_level.clone()))
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let config = builder
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let app_config = config
            .try_deserialize::<AppConfig>()
            .map_err(|e| ConfigError::Deserialize(e.to_string()))?;

        app_config.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.servicebus_ns_name = required(
            self.servicebus_ns_name,
            KEY_SERVICEBUS_NS_NAME,
            SERVICEBUS_NS_NAME,
        )?;
        self.queue_name = required(self.queue_name, KEY_QUEUE_NAME, QUEUE_NAME)?;
        self.user_assigned_client_id = self
            .user_assigned_client_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        Ok(self)
    }

    pub fn servicebus_ns_name(&self) -> &str {
        &self.servicebus_ns_name
    }
    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }
    pub fn user_assigned_client_id(&self) -> Option<&str> {
        self.user_assigned_client_id.as_deref()
    }
    pub fn runs_in_azure(&self) -> bool {
        self.runs_in_azure
    }
    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Host name of the namespace, e.g. `contoso.servicebus.windows.net`.
    pub fn fully_qualified_namespace(&self) -> String {
        format!("{}.{}", self.servicebus_ns_name, SB_PUBLIC_SUFFIX)
    }
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

fn required(value: String, key: &str, env_var: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ConfigError::MissingValue {
            key: key.to_string(),
            env_var: env_var.to_string(),
        })
    } else {
        Ok(trimmed.to_string())
    }
}
