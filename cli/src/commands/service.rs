// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Monitored service commands
//!
//! Commands: add, remove, list

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use sentinel_core::application::config_store::{ConfigStore, ConfigStoreError, LoadReport};
use sentinel_core::domain::config::{ServiceEntry, ServiceId, ServiceType};
use sentinel_core::domain::node_config::SentinelConfig;

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// Add a monitored service
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Service type (docker, systemd, kubernetes, static)
        #[arg(long = "type", value_name = "TYPE", default_value = "docker")]
        service_type: String,

        /// Container name, unit, or host
        #[arg(long, default_value = "")]
        details: String,
    },

    /// Remove a monitored service by id
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List monitored services
    List,
}

pub async fn handle_command(command: ServiceCommand, config: &SentinelConfig) -> Result<()> {
    let (store, report) = super::open_store(config).await?;

    match command {
        ServiceCommand::Add {
            name,
            service_type,
            details,
        } => {
            refuse_fallback(&report)?;
            let entry = store
                .add_service(name, ServiceType::parse(&service_type), details)
                .await
                .map_err(describe)?;
            println!(
                "{}",
                format!("✓ Added {} ({})", entry.name, entry.id).green()
            );
            Ok(())
        }
        ServiceCommand::Remove { id } => {
            refuse_fallback(&report)?;
            let id = ServiceId(id);
            let before = store.current().services.len();
            let after = remove(&store, &id).await?;
            if after < before {
                println!("{}", format!("✓ Removed {}", id).green());
            } else {
                println!("{}", format!("No service with id {}", id).yellow());
            }
            Ok(())
        }
        ServiceCommand::List => {
            let snapshot = store.current();
            if snapshot.services.is_empty() {
                println!("{}", "No services configured".dimmed());
            }
            for entry in &snapshot.services {
                println!("{}", render_row(entry));
            }
            Ok(())
        }
    }
}

async fn remove(store: &ConfigStore, id: &ServiceId) -> Result<usize> {
    let snapshot = store.remove_service(id).await.map_err(describe)?;
    Ok(snapshot.services.len())
}

/// Writing after a fallback would replace the operator's broken document with defaults
fn refuse_fallback(report: &LoadReport) -> Result<()> {
    if report.fell_back() {
        anyhow::bail!(
            "{} could not be loaded; fix it or run `sentinel config generate` before editing",
            report.location
        );
    }
    Ok(())
}

fn describe(error: ConfigStoreError) -> anyhow::Error {
    if let Some(violations) = error.violations() {
        for violation in violations {
            eprintln!("  {} {}", "✗".red(), violation);
        }
    }
    error.into()
}

pub fn render_row(entry: &ServiceEntry) -> String {
    let details = if entry.details.is_empty() {
        "-"
    } else {
        entry.details.as_str()
    };
    format!(
        "{:<16} {:<24} {:<12} {}",
        entry.id.as_str(),
        entry.name,
        entry.service_type.as_str(),
        details
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_row() {
        let entry = ServiceEntry {
            id: ServiceId::from("svc-0"),
            name: "api-server".into(),
            service_type: ServiceType::Docker,
            details: String::new(),
        };
        let row = render_row(&entry);
        assert!(row.starts_with("svc-0"));
        assert!(row.contains("api-server"));
        assert!(row.contains("docker"));
        assert!(row.ends_with('-'));
    }
}
