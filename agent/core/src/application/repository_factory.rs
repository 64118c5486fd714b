// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates the concrete document repository for a storage backend, keeping
//! the domain layer free of infrastructure types.

use std::sync::Arc;

use crate::domain::repository::{ConfigDocumentRepository, StorageBackend};
use crate::infrastructure::repositories::{FileDocumentRepository, InMemoryDocumentRepository};

/// Creates a ConfigDocumentRepository implementation based on the configured backend
pub fn create_document_repository(backend: &StorageBackend) -> Arc<dyn ConfigDocumentRepository> {
    match backend {
        StorageBackend::InMemory => Arc::new(InMemoryDocumentRepository::new()),
        StorageBackend::File(path) => Arc::new(FileDocumentRepository::new(path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selects_location() {
        let memory = create_document_repository(&StorageBackend::InMemory);
        assert_eq!(memory.location(), "memory");

        let file = create_document_repository(&StorageBackend::File("/tmp/server-config.yaml".into()));
        assert_eq!(file.location(), "/tmp/server-config.yaml");
    }
}
