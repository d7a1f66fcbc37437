//! Drupal Agent - CLI entry point

use std::process::ExitCode;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    drupal_agent::run()
        .await
        .context("drupal-agent failed")
}
