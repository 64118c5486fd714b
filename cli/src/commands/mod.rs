// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Sentinel CLI

pub mod ask;
pub mod config;
pub mod serve;
pub mod service;

pub use self::config::ConfigCommand;
pub use self::service::ServiceCommand;

use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use sentinel_core::application::config_store::{ConfigStore, LoadIssue, LoadReport};
use sentinel_core::application::repository_factory::create_document_repository;
use sentinel_core::domain::node_config::SentinelConfig;
use sentinel_core::domain::repository::StorageBackend;

/// Open and load the store backed by the host config's document path.
/// Fallbacks are reported on stderr; only unreadable documents are errors.
pub async fn open_store(config: &SentinelConfig) -> Result<(Arc<ConfigStore>, LoadReport)> {
    let backend = StorageBackend::File(config.agent_config_path.clone());
    let store = Arc::new(ConfigStore::new(create_document_repository(&backend)));
    let report = store
        .load()
        .await
        .with_context(|| format!("Failed to load {}", config.agent_config_path.display()))?;

    match &report.issue {
        None | Some(LoadIssue::NotFound) => {}
        Some(LoadIssue::MalformedDocument(reason)) => {
            eprintln!(
                "{} {} is malformed ({}); using defaults",
                "warning:".yellow().bold(),
                report.location,
                reason
            );
        }
        Some(LoadIssue::InvalidDocument(violations)) => {
            eprintln!(
                "{} {} has {} violation(s); using defaults",
                "warning:".yellow().bold(),
                report.location,
                violations.len()
            );
            for violation in violations {
                eprintln!("  - {}", violation);
            }
        }
    }

    Ok((store, report))
}
