// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use sentinel_core::application::summary::ConfigSummary;
use sentinel_core::domain::config::AgentConfiguration;
use sentinel_core::domain::node_config::SentinelConfig;
use sentinel_core::domain::validation::{validate as validate_config, Violation};
use sentinel_core::infrastructure::config_codec::ConfigCodec;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the current agent configuration
    Show {
        /// Show host config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate an agent configuration document
    Validate {
        /// Path to document (default: agent_config_path)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate a defaulted configuration file
    Generate {
        /// Output path (default: ./server-config.yaml, or ./sentinel.yaml with --host)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate the host configuration instead of the agent document
        #[arg(long)]
        host: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config: &SentinelConfig,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config, config_override, paths).await,
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(|| config.agent_config_path.clone());
            validate(config, &path).await
        }
        ConfigCommand::Generate { output, host } => generate(output, host).await,
    }
}

async fn show(config: &SentinelConfig, config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Host configuration discovery paths:".bold());
        let env_path = std::env::var("SENTINEL_CONFIG_PATH").ok();
        for (step, line) in discovery_paths(config_override.as_deref(), env_path.as_deref())
            .iter()
            .enumerate()
        {
            println!("  {}. {}", step + 1, line);
        }
        println!();
    }

    let (store, report) = super::open_store(config).await?;
    let snapshot = store.current();
    let summary = ConfigSummary::from_config(&snapshot)?;

    println!("{}", "Agent:".bold());
    println!("  Name: {}", config.agent_name);
    println!("  Document: {}", report.location);
    println!("  Durability: {:?}", store.durability());
    println!();

    println!("{}", "Summary:".bold());
    println!("  Services: {}", summary.services);
    println!(
        "  Auto-remediation: {}/{} enabled",
        summary.remediation_enabled, summary.remediation_total
    );
    println!("  Window start: {}", summary.window_start);
    println!("  Notifications: {}", summary.notification_channel);
    println!();

    println!("{}", "Advisor:".bold());
    if config.advisor.enabled {
        println!("  Provider: {} ({})", config.advisor.provider, config.advisor.model);
        let key = if config.resolve_api_key().is_some() {
            "configured".green()
        } else {
            "missing".yellow()
        };
        println!("  API key: {}", key);
    } else {
        println!("  {}", "disabled".dimmed());
    }
    println!();

    println!("{}", "Preview (secrets masked):".bold());
    println!("{}", summary.preview);

    Ok(())
}

/// Decode and validate the document at `path`. Returns every violation.
/// Host config locations in the order `SentinelConfig::load_or_default` tries them
pub fn discovery_paths(config_override: Option<&Path>, env_path: Option<&str>) -> Vec<String> {
    let not_set = "(not set)".dimmed().to_string();
    let system = if cfg!(windows) {
        "C:\\ProgramData\\Sentinel\\config.yaml"
    } else {
        "/etc/sentinel/config.yaml"
    };

    vec![
        format!(
            "--config flag: {}",
            config_override.map_or(not_set.clone(), |p| p.display().to_string())
        ),
        format!(
            "SENTINEL_CONFIG_PATH: {}",
            env_path.map_or(not_set, str::to_string)
        ),
        "./sentinel.yaml".to_string(),
        "~/.sentinel/config.yaml".to_string(),
        system.to_string(),
    ]
}

pub fn check_document(path: &Path) -> Result<(AgentConfiguration, Vec<Violation>)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = ConfigCodec::decode(&text)
        .with_context(|| format!("{} is not a valid configuration document", path.display()))?;
    let violations = validate_config(&config);
    Ok((config, violations))
}

async fn validate(host: &SentinelConfig, path: &Path) -> Result<()> {
    println!("Validating host configuration...");
    host.validate().context("Host configuration validation failed")?;
    println!("{}", "✓ Host configuration is valid".green());

    println!("Validating {}...", path.display());
    let (config, violations) = check_document(path)?;

    if !violations.is_empty() {
        for violation in &violations {
            println!("  {} {}", "✗".red(), violation);
        }
        anyhow::bail!("{} violation(s) in {}", violations.len(), path.display());
    }

    println!(
        "{}",
        format!(
            "✓ Configuration is valid ({} service(s))",
            config.services.len()
        )
        .green()
    );

    Ok(())
}

async fn generate(output: Option<PathBuf>, host: bool) -> Result<()> {
    let output = if host {
        let output = output.unwrap_or_else(|| PathBuf::from("./sentinel.yaml"));
        SentinelConfig::default()
            .to_yaml_file(&output)
            .with_context(|| format!("Failed to write config to {:?}", output))?;
        output
    } else {
        let output = output.unwrap_or_else(|| PathBuf::from("./server-config.yaml"));
        let document = ConfigCodec::encode_yaml(&AgentConfiguration::default())?;
        std::fs::write(&output, document)
            .with_context(|| format!("Failed to write config to {:?}", output))?;
        output
    };

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
