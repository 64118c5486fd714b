// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Sentinel CLI
//!
//! The `sentinel` binary manages the configuration of a host-maintenance
//! agent and serves it to the dashboard.
//!
//! ## Commands
//!
//! - `sentinel config show|validate|generate` - Configuration document management
//! - `sentinel service add|remove|list` - Monitored services
//! - `sentinel serve` - HTTP query interface for the dashboard
//! - `sentinel ask` - One-shot question to the configuration advisor

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use sentinel_cli::commands::{self, ConfigCommand, ServiceCommand};
use sentinel_core::domain::node_config::SentinelConfig;

/// Sentinel - host-maintenance agent configuration
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to host configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "SENTINEL_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); defaults to logging.level
    #[arg(long, global = true, env = "SENTINEL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (text, json); defaults to logging.format
    #[arg(long, global = true, env = "SENTINEL_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration document management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Monitored service management
    #[command(name = "service")]
    Service {
        #[command(subcommand)]
        command: ServiceCommand,
    },

    /// Serve the HTTP query interface
    #[command(name = "serve")]
    Serve {
        /// Bind address (default: api.bind_address)
        #[arg(long)]
        bind: Option<String>,

        /// Port (default: api.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Ask the configuration advisor a question
    #[command(name = "ask")]
    Ask {
        /// Question about the current configuration
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = SentinelConfig::load_or_default(cli.config.clone())
        .context("Failed to load host configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    init_logging(level, format)?;

    match cli.command {
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, &config, cli.config).await
        }
        Some(Commands::Service { command }) => {
            commands::service::handle_command(command, &config).await
        }
        Some(Commands::Serve { bind, port }) => {
            commands::serve::run(&config, bind, port).await
        }
        Some(Commands::Ask { prompt }) => commands::ask::run(&config, &prompt).await,
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }

    Ok(())
}
