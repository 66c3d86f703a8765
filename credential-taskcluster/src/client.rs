//! Taskcluster Secrets service client.

use crate::error::TaskclusterError;
use crate::hawk::Credentials;
use crate::retry::{retry, RetryConfig};
use crate::secret::Secret;
use reqwest::{header, Method, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Path of the `get` endpoint below the root URL; the secret name is appended
/// as one more segment.
const SECRET_PATH: [&str; 4] = ["api", "secrets", "v1", "secret"];

/// Where secrets are read from, and the credentials used to sign requests.
#[derive(Debug)]
pub struct Endpoint {
    base_url: Url,
    credentials: Option<Credentials>,
}

impl Endpoint {
    /// An unauthenticated endpoint, e.g. the task's proxy.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for reading secrets.
pub struct SecretsClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    retry: RetryConfig,
}

impl SecretsClient {
    pub fn new(
        endpoint: Endpoint,
        request_timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, TaskclusterError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("git-credential-taskcluster/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            retry,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the URL of a secret.
    pub fn secret_url(&self, name: &str) -> Result<Url, TaskclusterError> {
        let mut url = self.endpoint.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TaskclusterError::InvalidUrl(self.endpoint.base_url.to_string()))?
            .pop_if_empty()
            .extend(SECRET_PATH)
            .push(name);
        Ok(url)
    }

    /// Reads a secret, retrying transient failures.
    pub async fn get(&self, name: &str) -> Result<Secret, TaskclusterError> {
        let url = self.secret_url(name)?;
        retry(&self.retry, || self.get_once(name, &url)).await
    }

    async fn get_once(&self, name: &str, url: &Url) -> Result<Secret, TaskclusterError> {
        let mut request = self.http.get(url.clone());
        if let Some(credentials) = &self.endpoint.credentials {
            request = request.header(
                header::AUTHORIZATION,
                credentials.authorization(&Method::GET, url)?,
            );
        }

        debug!(%url, "fetching secret");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        Err(match status {
            StatusCode::NOT_FOUND => TaskclusterError::SecretNotFound(name.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TaskclusterError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => TaskclusterError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}
