//! dockprobe CLI - Main entry point

mod cli;
mod handler;
mod registration;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Args, Command, StartArgs};
use dockprobe_foundation::ProbeConfig;
use dockprobe_task::{drive, DockerRuntime, StartContainer, Status};
use handler::{render_report, ConsoleHandler};
use registration::RegistrationListener;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let status = match args.command {
        Command::Start(start) => run_start(args.config.as_deref(), start).await?,
    };

    if status != Status::Success {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_start(config_path: Option<&Path>, args: StartArgs) -> anyhow::Result<Status> {
    let mut config = ProbeConfig::load(config_path).context("failed to load probe config")?;
    config.merge(args.overrides());
    config.validate()?;

    let runtime = DockerRuntime::connect()?;
    if !runtime.is_available().await {
        bail!("Docker daemon is not reachable");
    }

    let listener = RegistrationListener::bind(&config.registration_addr)
        .await
        .with_context(|| format!("failed to listen on {}", config.registration_addr))?;
    let handler = Arc::new(ConsoleHandler::new(Arc::new(runtime), listener.flag()));

    let task = StartContainer::from_config(args.container_id, args.instance, &config)
        .into_task(handler.clone());
    info!(
        "Running container test {} (timeout {}s)",
        task.id(),
        config.worker_wait_timeout_secs
    );

    let status = tokio::select! {
        result = drive(&task, config.poll_interval()) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, abandoning container test {}", task.id());
            bail!("interrupted");
        }
    };

    if let Some(report) = handler.last_report() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", render_report(&report));
        }
    }

    Ok(status)
}
