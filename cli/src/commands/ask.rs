// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `sentinel ask` - one-shot advisor question

use anyhow::{Context, Result};
use std::sync::Arc;

use sentinel_core::application::advisor::AdvisorService;
use sentinel_core::domain::node_config::SentinelConfig;
use sentinel_core::infrastructure::llm::LlmAdvisor;

pub async fn run(config: &SentinelConfig, prompt: &str) -> Result<()> {
    let (store, _) = super::open_store(config).await?;
    let gateway = LlmAdvisor::from_config(config).context("Failed to initialize advisor")?;
    let advisor = AdvisorService::new(store, Arc::new(gateway));

    let text = advisor.ask(prompt).await?;
    println!("{}", text);
    Ok(())
}
