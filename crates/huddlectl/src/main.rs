//! huddlectl - command-line client for the huddle session service
//!
//! Subcommands:
//! - `huddlectl create <name>` - Create a session
//! - `huddlectl get <id>` / `list` / `delete <id>` - Inspect and remove sessions
//! - `huddlectl waiting` - List devices waiting for a session
//! - `huddlectl wait-for <device>` - Follow sessions becoming ready for a device
//! - `huddlectl join <device> <session>` - Join and follow the device's state
//! - `huddlectl config` - Show the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huddle::{DeviceId, SessionClient, SessionId, SessionService};
use huddleconf::{ConfigSources, HuddleConfig};
use tracing::{debug, warn};

mod commands;
mod output;
mod telemetry;

use output::Output;

#[derive(Parser)]
#[command(name = "huddlectl")]
#[command(about = "Command-line client for the huddle session service")]
#[command(version)]
struct Cli {
    /// Config file to load in place of ./huddle.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session service endpoint (e.g., http://127.0.0.1:50051)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a session
    Create {
        /// Session name
        name: String,

        /// Device to admit (repeatable)
        #[arg(short, long = "device")]
        devices: Vec<DeviceId>,
    },

    /// Show one session
    Get {
        /// Session ID
        session_id: SessionId,
    },

    /// List all sessions
    List,

    /// Delete a session
    Delete {
        /// Session ID
        session_id: SessionId,
    },

    /// List devices waiting for a session
    Waiting,

    /// Follow sessions becoming ready for a device
    WaitFor {
        /// Device ID
        device_id: DeviceId,

        /// Stop after this many updates
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Join a session and follow the device's state in it
    Join {
        /// Device ID
        device_id: DeviceId,

        /// Session ID
        session_id: SessionId,

        /// Stop after this many updates
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show the effective configuration and where it came from
    Config,
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, sources) = HuddleConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(endpoint) = cli.endpoint {
        config.client.endpoint = endpoint;
    }

    let telemetry = telemetry::init(&config.telemetry)?;
    debug!("Loaded config from {:?}", sources.files);

    let mut out = Output::stdout(cli.json);
    let result = run(cli.command, &config, &sources, &mut out).await;

    telemetry.shutdown();
    result
}

async fn run(
    command: Commands,
    config: &HuddleConfig,
    sources: &ConfigSources,
    out: &mut Output,
) -> Result<()> {
    if let Commands::Config = command {
        return out.config(config, sources);
    }

    let client = SessionClient::from_config(&config.client)
        .await
        .context("Failed to set up session client")?;

    let result = match command {
        Commands::Create { name, devices } => {
            commands::create(&client, &name, &devices, out).await
        }
        Commands::Get { session_id } => commands::get(&client, session_id, out).await,
        Commands::List => commands::list(&client, out).await,
        Commands::Delete { session_id } => commands::delete(&client, session_id, out).await,
        Commands::Waiting => commands::waiting(&client, out).await,
        Commands::WaitFor { device_id, count } => {
            commands::wait_for(&client, device_id, count, interrupted(), out)
                .await
                .map(drop)
        }
        Commands::Join {
            device_id,
            session_id,
            count,
        } => commands::join(&client, device_id, session_id, count, interrupted(), out)
            .await
            .map(drop),
        Commands::Config => Ok(()),
    };

    client.close();
    result
}
