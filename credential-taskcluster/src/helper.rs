//! Read-only credential backend over a Taskcluster secret.

use crate::client::SecretsClient;
use crate::config::TaskclusterConfig;
use crate::error::TaskclusterError;
use crate::secret::SecretContents;
use async_trait::async_trait;
use credential_helper::Helper;
use credential_protocol::Message;
use tracing::{debug, info};

/// Serves credentials from the host table of a single secret.
///
/// The secret is fetched on every `retrieve`; `store` and `erase` are
/// accepted and ignored.
pub struct TaskclusterHelper {
    client: SecretsClient,
    secret_name: String,
}

impl TaskclusterHelper {
    pub fn new(client: SecretsClient, secret_name: impl Into<String>) -> Self {
        Self {
            client,
            secret_name: secret_name.into(),
        }
    }

    pub fn from_config(config: &TaskclusterConfig) -> Result<Self, TaskclusterError> {
        let client = SecretsClient::new(
            config.endpoint()?,
            config.request_timeout(),
            config.retry_config(),
        )?;
        Ok(Self::new(client, config.secret_name.as_str()))
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }
}

#[async_trait]
impl Helper for TaskclusterHelper {
    type Error = TaskclusterError;

    async fn retrieve(&self, input: Message) -> Result<Message, Self::Error> {
        info!(host = %input.host, secret = %self.secret_name, "fetching credentials");

        let secret = self.client.get(&self.secret_name).await?;
        let contents = SecretContents::from_value(secret.secret)?;
        contents.credential_for(&input.host)
    }

    async fn store(&self, input: Message) -> Result<(), Self::Error> {
        debug!(host = %input.host, "ignoring store, secrets are read-only");
        Ok(())
    }

    async fn erase(&self, input: Message) -> Result<(), Self::Error> {
        debug!(host = %input.host, "ignoring erase, secrets are read-only");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use credential_helper::{run_helper, HelperError};
    use credential_protocol::Field;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET_PATH: &str = "/api/secrets/v1/secret/shared%2Fgit";

    fn config(server: &MockServer) -> TaskclusterConfig {
        TaskclusterConfig {
            proxy_url: Some(server.uri()),
            max_attempts: 1,
            ..TaskclusterConfig::default()
        }
    }

    async fn serve_hosts(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(SECRET_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secret": {
                    "hosts": {
                        "github.com": { "username": "ci-bot", "password": "ghp_token" }
                    }
                },
                "expires": "2030-01-01T00:00:00.000Z"
            })))
            .mount(server)
            .await;
    }

    fn request(host: &str) -> Message {
        Message::new()
            .with(Field::Protocol, "https")
            .with(Field::Host, host)
    }

    #[tokio::test]
    async fn test_retrieve_known_host() {
        let server = MockServer::start().await;
        serve_hosts(&server).await;

        let helper = TaskclusterHelper::from_config(&config(&server)).unwrap();
        let msg = helper.retrieve(request("github.com")).await.unwrap();

        assert_eq!(msg.username, "ci-bot");
        assert_eq!(msg.password, "ghp_token");
        assert!(msg.protocol.is_empty());
        assert!(msg.host.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_unknown_host() {
        let server = MockServer::start().await;
        serve_hosts(&server).await;

        let helper = TaskclusterHelper::from_config(&config(&server)).unwrap();
        let err = helper.retrieve(request("gitlab.com")).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown host: gitlab.com");
    }

    #[tokio::test]
    async fn test_store_and_erase_do_not_call_service() {
        let server = MockServer::start().await;
        let helper = TaskclusterHelper::from_config(&config(&server)).unwrap();

        helper.store(request("github.com")).await.unwrap();
        helper.erase(request("github.com")).await.unwrap();
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_helper_rejects_get_alias() {
        let server = MockServer::start().await;
        serve_hosts(&server).await;
        let helper = TaskclusterHelper::from_config(&config(&server)).unwrap();

        let mut input: &[u8] = b"protocol=https\nhost=github.com\n\n";
        let mut output = Vec::new();
        let err = run_helper(&helper, "get", &mut input, &mut output)
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::UnsupportedCommand(c) if c == "get"));
        assert!(output.is_empty());

        let mut input: &[u8] = b"protocol=https\nhost=github.com\n\n";
        run_helper(&helper, "retrieve", &mut input, &mut output)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "username=ci-bot\npassword=ghp_token\n"
        );
    }

    #[tokio::test]
    async fn test_run_helper_surfaces_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Secret not found"
            })))
            .mount(&server)
            .await;
        let helper = TaskclusterHelper::from_config(&config(&server)).unwrap();

        let mut input: &[u8] = b"host=github.com\n";
        let mut output = Vec::new();
        let err = run_helper(&helper, "retrieve", &mut input, &mut output)
            .await
            .unwrap_err();

        assert!(matches!(
            err.backend_error::<TaskclusterError>(),
            Some(TaskclusterError::SecretNotFound(name)) if name == "shared/git"
        ));
        assert!(matches!(err, HelperError::Backend(_)));
        assert!(output.is_empty());
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let result = TaskclusterHelper::from_config(&TaskclusterConfig::default());
        assert!(matches!(
            result,
            Err(TaskclusterError::Config(ConfigError::Validation(_)))
        ));
    }
}
