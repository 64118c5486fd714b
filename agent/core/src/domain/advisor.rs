// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Advisor gateway
//!
//! Contract for the natural-language advice generator. The generator only
//! ever receives a shared reference to a snapshot copy, so it cannot reach
//! the store's state.

use crate::domain::config::AgentConfiguration;
use crate::domain::llm::LLMError;
use async_trait::async_trait;

#[async_trait]
pub trait AdvisorGateway: Send + Sync {
    /// Advisory text for `utterance` given a validated configuration snapshot
    async fn advise(
        &self,
        utterance: &str,
        snapshot: &AgentConfiguration,
    ) -> Result<String, AdvisorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("API key is missing; set the advisor api_key (e.g. env:API_KEY)")]
    MissingApiKey,

    #[error("Advisor is disabled in the host configuration")]
    Disabled,

    #[error("Advisor generation failed: {0}")]
    Generation(#[from] LLMError),
}
