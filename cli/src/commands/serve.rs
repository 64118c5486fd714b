// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `sentinel serve` - HTTP query interface for the dashboard

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use sentinel_core::application::advisor::AdvisorService;
use sentinel_core::domain::node_config::SentinelConfig;
use sentinel_core::infrastructure::llm::LlmAdvisor;
use sentinel_core::presentation::api;

pub async fn run(config: &SentinelConfig, bind: Option<String>, port: Option<u16>) -> Result<()> {
    config.validate().context("Host configuration validation failed")?;

    let (store, report) = super::open_store(config).await?;
    info!(
        "Serving configuration from {} (clean load: {})",
        report.location,
        report.is_clean()
    );

    let gateway = LlmAdvisor::from_config(config).context("Failed to initialize advisor")?;
    let advisor = Arc::new(AdvisorService::new(store.clone(), Arc::new(gateway)));

    let port = port.unwrap_or(config.api.port);
    let bind = bind.unwrap_or_else(|| config.api.bind_address.clone());
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    api::serve(api::app(store, advisor, port), addr).await
}
