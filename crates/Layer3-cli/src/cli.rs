//! Command line arguments

use clap::{Args as ClapArgs, Parser, Subcommand};
use dockprobe_foundation::ProbeOverrides;
use std::path::PathBuf;
use uuid::Uuid;

/// dockprobe - container worker registration self-test
#[derive(Parser, Debug)]
#[command(name = "dockprobe")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Probe config file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a created container and wait for its worker to register
    Start(StartArgs),
}

#[derive(ClapArgs, Debug)]
pub struct StartArgs {
    /// ID of the already created test container
    pub container_id: String,

    /// Test instance id the container is labelled with
    #[arg(short, long)]
    pub instance: Uuid,

    /// Worker registration timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Delay between polls in milliseconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Label key carrying the test instance id
    #[arg(long)]
    pub label: Option<String>,

    /// Address to listen on for worker registration. Any TCP connection counts as a registration, so bind where only the worker can reach
    #[arg(long)]
    pub listen: Option<String>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

impl StartArgs {
    pub fn overrides(&self) -> ProbeOverrides {
        ProbeOverrides {
            worker_wait_timeout_secs: self.timeout,
            poll_interval_ms: self.interval,
            instance_label: self.label.clone(),
            registration_addr: self.listen.clone(),
        }
    }
}
