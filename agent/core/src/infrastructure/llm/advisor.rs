// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! LLM-backed [`AdvisorGateway`].
//!
//! The system instruction embeds the redacted snapshot as pretty JSON, so the
//! notification destination and credential reference never leave the process.

use crate::domain::advisor::{AdvisorError, AdvisorGateway};
use crate::domain::config::AgentConfiguration;
use crate::domain::llm::{GenerationOptions, LLMProvider};
use crate::domain::node_config::SentinelConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reply used when the model returns no text
pub const EMPTY_RESPONSE_FALLBACK: &str = "I couldn't generate a response.";

const GUIDELINES: &str = "Guidelines:
1. Be concise and technical but accessible.
2. If the user asks about schedule, analyze the current window.
3. If asked about security, recommend least-privilege principles.
4. Provide YAML snippets if asked for configuration files.";

enum ProviderState {
    Ready(Arc<dyn LLMProvider>),
    MissingApiKey,
    Disabled,
}

pub struct LlmAdvisor {
    provider: ProviderState,
    options: GenerationOptions,
    agent_name: String,
}

impl LlmAdvisor {
    pub fn new(provider: Arc<dyn LLMProvider>, options: GenerationOptions) -> Self {
        Self {
            provider: ProviderState::Ready(provider),
            options,
            agent_name: String::new(),
        }
    }

    /// Build from the host configuration. A missing key is not an error here;
    /// each `advise` call reports it instead.
    pub fn from_config(config: &SentinelConfig) -> anyhow::Result<Self> {
        let advisor = &config.advisor;
        let provider = if !advisor.enabled {
            ProviderState::Disabled
        } else {
            match config.resolve_api_key() {
                Some(key) => ProviderState::Ready(super::create_provider(advisor, key)?),
                None => {
                    warn!("No advisor API key configured; advice requests will be refused");
                    ProviderState::MissingApiKey
                }
            }
        };

        Ok(Self {
            provider,
            options: GenerationOptions {
                max_tokens: Some(advisor.max_tokens),
                temperature: Some(advisor.temperature),
            },
            agent_name: config.agent_name.clone(),
        })
    }

    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = agent_name.into();
        self
    }

    pub fn system_instruction(&self, snapshot: &AgentConfiguration) -> String {
        let context = serde_json::to_string_pretty(&snapshot.redacted())
            .unwrap_or_else(|_| "{}".to_string());
        let host = if self.agent_name.is_empty() {
            String::new()
        } else {
            format!(" running on '{}'", self.agent_name)
        };

        format!(
            "You are 'Sentinel', an expert DevOps AI assistant for configuring a Server Maintenance Agent{host}.\n\n\
             Your goal is to help the user configure their maintenance windows, services, and security rules.\n\n\
             Current User Configuration Context:\n{context}\n\n{GUIDELINES}\n"
        )
    }
}

#[async_trait]
impl AdvisorGateway for LlmAdvisor {
    async fn advise(
        &self,
        utterance: &str,
        snapshot: &AgentConfiguration,
    ) -> Result<String, AdvisorError> {
        let provider = match &self.provider {
            ProviderState::Ready(provider) => provider,
            ProviderState::MissingApiKey => return Err(AdvisorError::MissingApiKey),
            ProviderState::Disabled => return Err(AdvisorError::Disabled),
        };

        let system_instruction = self.system_instruction(snapshot);
        let response = provider
            .generate(&system_instruction, utterance, &self.options)
            .await?;
        debug!(
            "Advisor response from {} ({}): {:?}, {} chars",
            response.provider,
            response.model,
            response.finish_reason,
            response.text.len()
        );

        if response.text.trim().is_empty() {
            Ok(EMPTY_RESPONSE_FALLBACK.to_string())
        } else {
            Ok(response.text)
        }
    }
}
