//! Backend configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if one is given)
//! 3. Environment variables
//!
//! The binary applies its command-line flags on top.

use crate::client::Endpoint;
use crate::error::ConfigError;
use crate::hawk::Credentials;
use crate::retry::RetryConfig;
use crate::DEFAULT_SECRET_NAME;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

pub const ENV_SECRET_NAME: &str = "TASKCLUSTER_GIT_SECRET";
pub const ENV_PROXY_URL: &str = "TASKCLUSTER_PROXY_URL";
pub const ENV_ROOT_URL: &str = "TASKCLUSTER_ROOT_URL";
pub const ENV_CLIENT_ID: &str = "TASKCLUSTER_CLIENT_ID";
pub const ENV_ACCESS_TOKEN: &str = "TASKCLUSTER_ACCESS_TOKEN";
pub const ENV_CERTIFICATE: &str = "TASKCLUSTER_CERTIFICATE";
pub const ENV_REQUEST_TIMEOUT: &str = "TASKCLUSTER_REQUEST_TIMEOUT";
pub const ENV_MAX_ATTEMPTS: &str = "TASKCLUSTER_MAX_ATTEMPTS";

/// Taskcluster backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TaskclusterConfig {
    /// Name of the secret holding the host table.
    pub secret_name: String,
    /// Taskcluster deployment root URL.
    pub root_url: Option<String>,
    /// Taskcluster proxy URL. Takes precedence over `root_url`; the proxy
    /// signs requests itself.
    pub proxy_url: Option<String>,
    pub client_id: Option<String>,
    #[serde(deserialize_with = "deserialize_secret")]
    pub access_token: Option<SecretString>,
    #[serde(deserialize_with = "deserialize_secret")]
    pub certificate: Option<SecretString>,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
    /// Attempts per secrets request, including the first.
    pub max_attempts: u32,
}

impl Default for TaskclusterConfig {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            root_url: None,
            proxy_url: None,
            client_id: None,
            access_token: None,
            certificate: None,
            request_timeout_secs: 30,
            max_attempts: RetryConfig::default().max_attempts,
        }
    }
}

impl TaskclusterConfig {
    /// Loads configuration from an optional file, then applies environment
    /// variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Empty values are treated as unset.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(name) = get(ENV_SECRET_NAME) {
            self.secret_name = name;
        }
        if let Some(url) = get(ENV_PROXY_URL) {
            self.proxy_url = Some(url);
        }
        if let Some(url) = get(ENV_ROOT_URL) {
            self.root_url = Some(url);
        }
        if let Some(id) = get(ENV_CLIENT_ID) {
            self.client_id = Some(id);
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.access_token = Some(SecretString::from(token));
        }
        if let Some(cert) = get(ENV_CERTIFICATE) {
            self.certificate = Some(SecretString::from(cert));
        }
        if let Some(secs) = get(ENV_REQUEST_TIMEOUT).and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = secs;
        }
        if let Some(n) = get(ENV_MAX_ATTEMPTS).and_then(|v| v.parse().ok()) {
            self.max_attempts = n;
        }
    }

    /// Checks that an endpoint can be derived from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint().map(|_| ())
    }

    /// Resolves where secrets are read from and how requests are signed.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        if self.secret_name.is_empty() {
            return Err(ConfigError::Validation("secret name is empty".into()));
        }

        if let Some(proxy) = non_empty(&self.proxy_url) {
            return Ok(Endpoint::new(parse_url(proxy)?));
        }

        let root = non_empty(&self.root_url).ok_or_else(|| {
            ConfigError::Validation(format!(
                "one of {} or {} must be set",
                ENV_ROOT_URL, ENV_PROXY_URL
            ))
        })?;
        let endpoint = Endpoint::new(parse_url(root)?);

        let Some(client_id) = non_empty(&self.client_id) else {
            return Ok(endpoint);
        };
        let access_token = self
            .access_token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "{} is set but {} is not",
                    ENV_CLIENT_ID, ENV_ACCESS_TOKEN
                ))
            })?;

        let mut credentials =
            Credentials::new(client_id, access_token.expose_secret().to_owned());
        if let Some(cert) = &self.certificate {
            credentials = credentials.with_certificate(cert.expose_secret().to_owned());
        }
        credentials
            .ext()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        Ok(endpoint.with_credentials(credentials))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default().with_max_attempts(self.max_attempts)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::Validation(format!("invalid URL '{}': {}", raw, e)))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "invalid URL '{}': not a base URL",
            raw
        )));
    }
    Ok(url)
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()).map(SecretString::from))
}
