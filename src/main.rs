//! git-credential-taskcluster - git credential helper backed by Taskcluster secrets
//!
//! Reads a credential request from stdin, answers it from a Taskcluster secret
//! and writes the response to stdout. Logs go to stderr.

use clap::Parser;
use credential_helper::{run_helper, Command, NullHelper};
use credential_taskcluster::{TaskclusterConfig, TaskclusterHelper};
use secrecy::SecretString;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "git-credential-taskcluster")]
#[command(about = "Git credential helper backed by Taskcluster secrets")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to a YAML configuration file
    #[arg(short, long, env = "GIT_CREDENTIAL_TASKCLUSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Name of the secret holding the host table
    #[arg(long)]
    secret_name: Option<String>,

    /// Taskcluster proxy URL (requests are not signed)
    #[arg(long)]
    proxy_url: Option<String>,

    /// Taskcluster root URL
    #[arg(long)]
    root_url: Option<String>,

    /// Client id used to sign requests to the root URL
    #[arg(long)]
    client_id: Option<String>,

    /// Access token for the client id
    #[arg(long)]
    access_token: Option<String>,

    /// Certificate of temporary credentials (JSON)
    #[arg(long)]
    certificate: Option<String>,

    /// Operation requested by git: retrieve, store or erase
    command: String,
}

impl Cli {
    fn apply_to(&self, config: &mut TaskclusterConfig) {
        if let Some(name) = &self.secret_name {
            config.secret_name = name.clone();
        }
        if let Some(url) = &self.proxy_url {
            config.proxy_url = Some(url.clone());
        }
        if let Some(url) = &self.root_url {
            config.root_url = Some(url.clone());
        }
        if let Some(id) = &self.client_id {
            config.client_id = Some(id.clone());
        }
        if let Some(token) = &self.access_token {
            config.access_token = Some(SecretString::from(token.clone()));
        }
        if let Some(cert) = &self.certificate {
            config.certificate = Some(SecretString::from(cert.clone()));
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs go to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = TaskclusterConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        tracing::debug!("Loaded config from {}", path.display());
    }
    cli.apply_to(&mut config);

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    tokio::select! {
        result = dispatch(&cli.command, &config, &mut stdin, &mut stdout) => result,
        _ = interrupted() => Err("interrupted".into()),
    }
}

/// Runs `command` against the secrets backend.
///
/// Only `retrieve` needs an endpoint. Other commands fall back to a no-op
/// backend when none is configured, so `store`/`erase` succeed and unknown
/// commands are reported as such.
async fn dispatch<R, W>(
    command: &str,
    config: &TaskclusterConfig,
    input: &mut R,
    output: &mut W,
) -> Result<(), Box<dyn std::error::Error>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let needs_backend = matches!(command.parse::<Command>(), Ok(Command::Retrieve));

    match TaskclusterHelper::from_config(config) {
        Ok(helper) => run_helper(&helper, command, input, output).await?,
        Err(e) if !needs_backend => {
            tracing::debug!(error = %e, "no secrets endpoint, using no-op backend");
            run_helper(&NullHelper, command, input, output).await?
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
