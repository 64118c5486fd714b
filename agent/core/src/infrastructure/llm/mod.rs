// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each adapter translates between the domain LLMProvider interface and one
// vendor API. The advisor builds on whichever provider the host config names.

pub mod advisor;
pub mod gemini;
pub mod openai;
pub mod registry;

pub use advisor::LlmAdvisor;
pub use registry::create_provider;

use crate::domain::llm::LLMError;

/// Map a non-success HTTP status onto the domain error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String, model: &str) -> LLMError {
    match status.as_u16() {
        401 | 403 => LLMError::Authentication(body),
        429 => LLMError::RateLimit,
        404 => LLMError::ModelNotFound(model.to_string()),
        _ => LLMError::Provider(format!("HTTP {}: {}", status, body)),
    }
}
