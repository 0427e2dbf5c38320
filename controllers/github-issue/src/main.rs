//! GithubIssue Controller
//!
//! Mirrors GithubIssue custom resources onto issues of GitHub repositories:
//! - creates the issue when the resource appears
//! - pushes title and description edits
//! - closes the issue before the resource is allowed to go away
//!
//! A repository that answers with an unexpected HTTP code parks the resource in
//! a terminal failed state.

mod backoff;
mod classify;
mod config;
mod controller;
mod error;
mod reconciler;
mod store;
#[cfg(test)]
mod test_utils;
mod watcher;

use crate::config::Config;
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // kube and reqwest both pull in rustls; pick the provider explicitly
    let _ = rustls::crypto::ring::default_provider().install_default();

    info!("Starting GithubIssue Controller");

    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  GitHub API: {}", config.github_api_url);
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Resync interval: {:?}", config.resync_interval);
    info!("  HTTP timeout: {:?}", config.http_timeout);
    info!("  Concurrency: {}", config.concurrency);

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
