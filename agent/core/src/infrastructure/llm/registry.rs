// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Factory
//
// Builds the provider named by the host configuration's advisor section.

use crate::domain::llm::LLMProvider;
use crate::domain::node_config::AdvisorConfig;
use std::sync::Arc;
use tracing::info;

use super::gemini::GeminiAdapter;
use super::openai::OpenAIAdapter;

/// Create a provider instance for `config` using an already resolved API key
pub fn create_provider(config: &AdvisorConfig, api_key: String) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let provider: Arc<dyn LLMProvider> = match config.provider.as_str() {
        "gemini" => Arc::new(GeminiAdapter::new(
            config.endpoint.clone(),
            api_key,
            config.model.clone(),
        )),
        "openai" => Arc::new(OpenAIAdapter::new(
            config.endpoint.clone(),
            api_key,
            config.model.clone(),
        )),
        "openai-compatible" => Arc::new(
            OpenAIAdapter::new(config.endpoint.clone(), api_key, config.model.clone())
                .with_provider_name("openai-compatible"),
        ),
        other => anyhow::bail!("Unsupported provider type: {}", other),
    };

    info!(
        "Initialized advisor provider '{}' (model {})",
        provider.name(),
        config.model
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_providers() {
        let mut config = AdvisorConfig::default();
        for name in ["gemini", "openai", "openai-compatible"] {
            config.provider = name.to_string();
            let provider = create_provider(&config, "key".into()).unwrap();
            assert_eq!(provider.name(), name);
        }
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = AdvisorConfig {
            provider: "ollama".into(),
            ..Default::default()
        };
        let err = create_provider(&config, "key".into()).err().unwrap();
        assert!(err.to_string().contains("ollama"));
    }
}
