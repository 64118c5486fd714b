// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Advisor tests against a mocked provider endpoint.

use sentinel_core::application::advisor::AdvisorService;
use sentinel_core::application::config_store::ConfigStore;
use sentinel_core::domain::advisor::AdvisorError;
use sentinel_core::domain::node_config::SentinelConfig;
use sentinel_core::infrastructure::llm::advisor::EMPTY_RESPONSE_FALLBACK;
use sentinel_core::infrastructure::llm::LlmAdvisor;
use sentinel_core::infrastructure::repositories::InMemoryDocumentRepository;
use std::sync::Arc;

const DOCUMENT: &str = r#"
maintenance_window:
  days: [Sunday]
  start_time: "01:00"
  end_time: "05:00"
notifications:
  method: pagerduty
  contact: R0UT1NGK3Y
security:
  credential_reference: /etc/sentinel/id_ed25519
"#;

async fn service_for(config: &SentinelConfig) -> AdvisorService {
    let store = Arc::new(ConfigStore::new(Arc::new(
        InMemoryDocumentRepository::with_document(DOCUMENT),
    )));
    store.load().await.unwrap();
    let gateway = LlmAdvisor::from_config(config).unwrap();
    AdvisorService::new(store, Arc::new(gateway))
}

fn host_config(provider: &str, endpoint: String) -> SentinelConfig {
    let mut config = SentinelConfig::default();
    config.advisor.provider = provider.to_string();
    config.advisor.endpoint = endpoint;
    config.advisor.model = "test-model".to_string();
    config.advisor.api_key = Some("literal-test-key".to_string());
    config
}

#[tokio::test]
async fn test_gemini_advice_sees_redacted_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/test-model:generateContent")
        .match_header("x-goog-api-key", "literal-test-key")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("Sunday".into()),
            mockito::Matcher::Regex("Is my window long enough".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Four hours on Sunday is plenty."}]},"finishReason":"STOP"}]}"#)
        .create_async()
        .await;
    // Secrets must never reach the provider.
    let leak = server
        .mock("POST", "/models/test-model:generateContent")
        .match_body(mockito::Matcher::Regex("R0UT1NGK3Y|id_ed25519".into()))
        .expect(0)
        .create_async()
        .await;

    let service = service_for(&host_config("gemini", server.url())).await;
    let text = service.ask("Is my window long enough?").await.unwrap();

    assert_eq!(text, "Four hours on Sunday is plenty.");
    mock.assert_async().await;
    leak.assert_async().await;
}

#[tokio::test]
async fn test_openai_empty_answer_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":""},"finish_reason":"stop"}]}"#)
        .create_async()
        .await;

    let service = service_for(&host_config("openai-compatible", server.url())).await;
    let text = service.ask("anything").await.unwrap();
    assert_eq!(text, EMPTY_RESPONSE_FALLBACK);
}

#[tokio::test]
async fn test_provider_failure_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let service = service_for(&host_config("openai", server.url())).await;
    let err = service.ask("anything").await.unwrap_err();
    assert!(matches!(err, AdvisorError::Generation(_)));
    assert!(err.to_string().contains("upstream exploded"));
}

#[tokio::test]
async fn test_missing_key_is_reported_without_network() {
    let mut config = host_config("gemini", "http://127.0.0.1:9".to_string());
    config.advisor.api_key = Some(String::new());

    let service = service_for(&config).await;
    let err = service.ask("anything").await.unwrap_err();
    assert!(matches!(err, AdvisorError::MissingApiKey));
}
