// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Configuration Document Repository
//!
//! Persistence contract for the agent configuration document. The repository
//! moves raw document text only; turning it into an `AgentConfiguration` is
//! the codec's job, and deciding what may be written is the store's.
//!
//! | Implementation | Backend |
//! |----------------|---------|
//! | `FileDocumentRepository` | YAML file on local disk, atomic replace |
//! | `InMemoryDocumentRepository` | Process memory, for tests and dry runs |

use async_trait::async_trait;
use std::path::PathBuf;

/// Storage backend for the configuration document
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    File(PathBuf),
}

#[async_trait]
pub trait ConfigDocumentRepository: Send + Sync {
    /// Read the persisted document. `Ok(None)` when nothing has been persisted yet.
    async fn read(&self) -> Result<Option<String>, RepositoryError>;

    /// Durably replace the persisted document
    async fn write(&self, document: &str) -> Result<(), RepositoryError>;

    /// Human-readable location for logs and CLI output
    fn location(&self) -> String;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("I/O error on {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Document is not valid UTF-8: {0}")]
    Encoding(String),
}
