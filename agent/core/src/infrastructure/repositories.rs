// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of [`ConfigDocumentRepository`].
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve the configuration document
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! - **FileDocumentRepository** - YAML file on disk. Writes go to a sibling
//!   temporary file which is flushed to disk and then renamed over the
//!   target, so a reader never sees a half-written document. Every operation
//!   is bounded by an I/O timeout.
//! - **InMemoryDocumentRepository** - Ephemeral storage for tests and dry runs

use crate::domain::repository::{ConfigDocumentRepository, RepositoryError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct FileDocumentRepository {
    path: PathBuf,
    io_timeout: Duration,
}

impl FileDocumentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config.yaml".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            location: self.location(),
            source,
        }
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: std::future::Future<Output = std::io::Result<T>>,
    {
        match tokio::time::timeout(self.io_timeout, operation).await {
            Ok(result) => result.map_err(|e| self.io_error(e)),
            Err(_) => Err(self.io_error(std::io::Error::new(
                ErrorKind::TimedOut,
                format!("operation exceeded {:?}", self.io_timeout),
            ))),
        }
    }

    async fn write_atomically(&self, document: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        let result = async {
            let mut file = tokio::fs::File::create(&temp).await?;
            file.write_all(document.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&temp, &self.path).await
        }
        .await;

        if result.is_err() {
            // The target is untouched; only the partial temp file needs removing.
            let _ = tokio::fs::remove_file(&temp).await;
        }
        result
    }
}

#[async_trait]
impl ConfigDocumentRepository for FileDocumentRepository {
    async fn read(&self) -> Result<Option<String>, RepositoryError> {
        match tokio::time::timeout(self.io_timeout, tokio::fs::read(&self.path)).await {
            Ok(Ok(bytes)) => String::from_utf8(bytes).map(Some).map_err(|e| {
                RepositoryError::Encoding(format!("{} ({})", self.location(), e.utf8_error()))
            }),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
            Ok(Err(e)) => Err(self.io_error(e)),
            Err(_) => Err(self.io_error(std::io::Error::new(
                ErrorKind::TimedOut,
                format!("read exceeded {:?}", self.io_timeout),
            ))),
        }
    }

    async fn write(&self, document: &str) -> Result<(), RepositoryError> {
        self.bounded(self.write_atomically(document)).await
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    document: Arc<RwLock<Option<String>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(document.into()))),
        }
    }

    /// Current stored text, for assertions
    pub fn contents(&self) -> Option<String> {
        self.document.read().clone()
    }
}

#[async_trait]
impl ConfigDocumentRepository for InMemoryDocumentRepository {
    async fn read(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self.document.read().clone())
    }

    async fn write(&self, document: &str) -> Result<(), RepositoryError> {
        *self.document.write() = Some(document.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
