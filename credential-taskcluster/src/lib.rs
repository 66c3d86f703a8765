//! # credential-taskcluster
//!
//! Taskcluster secrets backend for the git credential helper.
//!
//! This crate provides:
//! - Layered configuration (defaults, YAML file, environment)
//! - An async client for the Taskcluster Secrets service with Hawk signing
//! - Retry with exponential backoff for transient failures
//! - [`TaskclusterHelper`], a read-only [`credential_helper::Helper`] that
//!   maps the requested host to credentials stored in a secret

pub mod client;
pub mod config;
pub mod error;
pub mod hawk;
pub mod helper;
pub mod retry;
pub mod secret;

pub use client::{Endpoint, SecretsClient};
pub use config::TaskclusterConfig;
pub use error::{ConfigError, TaskclusterError};
pub use hawk::Credentials;
pub use helper::TaskclusterHelper;
pub use retry::RetryConfig;
pub use secret::{HostSecret, Secret, SecretContents};

/// Secret read when none is configured.
pub const DEFAULT_SECRET_NAME: &str = "shared/git";
