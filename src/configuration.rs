use crate::domain::mapping::MappingError;
use crate::domain::notification::models::MailAddress;
use crate::registry::RegistryError;
use crate::utils::error_chain_fmt;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::Path;

/// Configuration key the database connection string is read from.
pub const CITY_INFO_DB_KEY: &str = "DbConnectionString:CityInfoDb";

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub general: GeneralSettings,
    pub application: ApplicationSettings,
    #[serde(default)]
    pub db_connection_string: ConnectionStrings,
    pub mail_settings: MailSettings,
    #[serde(default)]
    pub authorization: AuthorizationSettings,
    #[serde(skip)]
    pub environment: Environment,
}

impl Settings {
    pub fn log_level(&self) -> String {
        self.general.log_level.clone()
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct GeneralSettings {
    pub log_level: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct ConnectionStrings {
    pub city_info_db: Option<Secret<String>>,
}

impl ConnectionStrings {
    /// Returns the City Info connection string, rejecting a missing or blank value.
    pub fn city_info_db(&self) -> Result<&Secret<String>, ConfigurationError> {
        match &self.city_info_db {
            Some(value) if !value.expose_secret().trim().is_empty() => Ok(value),
            _ => Err(ConfigurationError::MissingConnectionString(CITY_INFO_DB_KEY)),
        }
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    Local,
    Cloud,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct MailSettings {
    pub transport: MailTransport,
    pub mail_to_address: String,
    pub mail_from_address: String,
    pub cloud: Option<CloudMailSettings>,
}

impl MailSettings {
    pub fn recipient(&self) -> Result<MailAddress, ConfigurationError> {
        MailAddress::parse(self.mail_to_address.clone())
            .map_err(|e| ConfigurationError::InvalidMailSettings(e.to_string()))
    }

    pub fn sender(&self) -> Result<MailAddress, ConfigurationError> {
        MailAddress::parse(self.mail_from_address.clone())
            .map_err(|e| ConfigurationError::InvalidMailSettings(e.to_string()))
    }

    pub fn cloud(&self) -> Result<&CloudMailSettings, ConfigurationError> {
        self.cloud.as_ref().ok_or_else(|| {
            ConfigurationError::InvalidMailSettings(
                "the cloud transport needs a `mail_settings.cloud` section".to_string(),
            )
        })
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct CloudMailSettings {
    pub base_url: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl CloudMailSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct AuthorizationSettings {
    pub api_key: Option<Secret<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Local)
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(ConfigurationError::UnknownEnvironment(s)),
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to determine the current directory")]
    WorkingDirectory(#[source] std::io::Error),
    #[error("Failed to load settings")]
    Settings(#[from] config::ConfigError),
    #[error("{0} is not a supported environment. Use either `local` or `production`.")]
    UnknownEnvironment(String),
    #[error("No connection string configured under `{0}`")]
    MissingConnectionString(&'static str),
    #[error("The connection string configured under `{key}` is malformed")]
    InvalidConnectionString {
        key: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("Invalid mail settings: {0}")]
    InvalidMailSettings(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Failed to configure the object mapper")]
    Mapping(#[from] MappingError),
}

impl std::fmt::Debug for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir().map_err(ConfigurationError::WorkingDirectory)?;
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;

    load_settings(&base_path.join("configuration"), environment)
}

/// Layers `base`, the environment file and `APP__*` variables, in that order.
pub fn load_settings(
    configuration_directory: &Path,
    environment: Environment,
) -> Result<Settings, ConfigurationError> {
    let mut settings = config::Config::default();
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    let mut settings: Settings = settings.try_into()?;
    settings.environment = environment;
    Ok(settings)
}
