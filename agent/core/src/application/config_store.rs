// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Configuration Store
//!
//! Sole owner of the current [`AgentConfiguration`]. Every write goes through
//! [`ConfigStore::replace`]: the candidate is validated as a whole and either
//! rejected with its complete violation list or swapped in and persisted.
//! There is no state in which an invalid configuration is current.
//!
//! ## Lifecycle
//!
//! 1. `ConfigStore::new(repository)` holds the defaulted configuration and is
//!    not yet loaded.
//! 2. `load()` once at process start. A malformed, non-UTF-8 or invalid
//!    document falls back to defaults and is reported through [`LoadReport`];
//!    only an I/O failure leaves the store unloaded.
//! 3. `replace()` / `add_service()` / `remove_service()` on every write.
//!    `sync()` retries persistence after a failed write. After a fallback all
//!    writes are refused with [`ConfigStoreError::FellBack`] until a later
//!    `load()` succeeds, so the operator's document is never overwritten with
//!    defaults.
//!
//! ## Concurrency
//!
//! Readers clone an `Arc` under a short `parking_lot` read lock and never wait
//! for I/O. Writers serialize on an async mutex held for validate + encode +
//! swap + write only. Candidates for service edits are computed outside that
//! mutex and re-derived if another write landed in between.

use crate::domain::config::{AgentConfiguration, ServiceEntry, ServiceId, ServiceType};
use crate::domain::repository::{ConfigDocumentRepository, RepositoryError};
use crate::domain::validation::{validate, Violation};
use crate::infrastructure::config_codec::{CodecError, ConfigCodec};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Read-only view of the configuration at one point in time
pub type ConfigSnapshot = Arc<AgentConfiguration>;

/// Relationship between the in-memory configuration and the persisted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    /// The persisted document encodes the current configuration
    Durable,
    /// The current configuration has not been confirmed on disk
    Unconfirmed,
}

/// Non-fatal condition encountered while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// Nothing persisted yet; defaults are in effect
    NotFound,
    /// The document could not be parsed; defaults are in effect
    MalformedDocument(String),
    /// The document decoded but broke validation rules; defaults are in effect
    InvalidDocument(Vec<Violation>),
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub location: String,
    pub issue: Option<LoadIssue>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issue.is_none()
    }

    /// True when the store fell back to defaults because of the document's content
    pub fn fell_back(&self) -> bool {
        matches!(
            self.issue,
            Some(LoadIssue::MalformedDocument(_)) | Some(LoadIssue::InvalidDocument(_))
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigStoreError {
    #[error("configuration rejected with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    /// The candidate is current but the durable write failed
    #[error("configuration accepted but not durably persisted: {0}")]
    Persistence(#[source] RepositoryError),

    #[error("configuration could not be encoded: {0}")]
    Encoding(#[from] CodecError),

    #[error("configuration document could not be read: {0}")]
    Unreadable(#[source] RepositoryError),

    #[error("configuration unavailable")]
    Unavailable,

    /// Defaults are in effect because the persisted document could not be used
    #[error("configuration document at {0} could not be loaded; fix it before writing")]
    FellBack(String),
}

impl ConfigStoreError {
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the candidate became current despite the error
    pub fn was_accepted(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

struct StoreState {
    config: ConfigSnapshot,
    durability: Durability,
    loaded: bool,
    fell_back: bool,
}

pub struct ConfigStore {
    repository: Arc<dyn ConfigDocumentRepository>,
    state: RwLock<StoreState>,
    write_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new(repository: Arc<dyn ConfigDocumentRepository>) -> Self {
        Self {
            repository,
            state: RwLock::new(StoreState {
                config: Arc::new(AgentConfiguration::default()),
                durability: Durability::Unconfirmed,
                loaded: false,
                fell_back: false,
            }),
            write_lock: Mutex::new(()),
        }
    }

    /// Read and decode the persisted document and make it current.
    pub async fn load(&self) -> Result<LoadReport, ConfigStoreError> {
        let _guard = self.write_lock.lock().await;
        let location = self.repository.location();

        let decoded = match self.repository.read().await {
            Ok(None) => None,
            Ok(Some(text)) => Some(ConfigCodec::decode(&text).map_err(|e| e.to_string())),
            // Bytes that are not text are as unusable as unparseable YAML.
            Err(e @ RepositoryError::Encoding(_)) => Some(Err(e.to_string())),
            Err(e) => {
                error!("Failed to read configuration document at {}: {}", location, e);
                return Err(ConfigStoreError::Unreadable(e));
            }
        };

        let (config, durability, issue) = match decoded {
            None => {
                info!("No configuration document at {}, using defaults", location);
                (AgentConfiguration::default(), Durability::Unconfirmed, Some(LoadIssue::NotFound))
            }
            Some(Err(e)) => {
                warn!("Configuration document at {} is malformed, falling back to defaults: {}", location, e);
                (
                    AgentConfiguration::default(),
                    Durability::Unconfirmed,
                    Some(LoadIssue::MalformedDocument(e)),
                )
            }
            Some(Ok(decoded)) => {
                let violations = validate(&decoded);
                if violations.is_empty() {
                    (decoded, Durability::Durable, None)
                } else {
                    warn!(
                        "Configuration document at {} has {} violation(s), falling back to defaults",
                        location,
                        violations.len()
                    );
                    for violation in &violations {
                        debug!("  {}", violation);
                    }
                    (
                        AgentConfiguration::default(),
                        Durability::Unconfirmed,
                        Some(LoadIssue::InvalidDocument(violations)),
                    )
                }
            }
        };

        info!(
            "Loaded agent configuration from {} ({} service(s))",
            location,
            config.services.len()
        );

        let report = LoadReport { location, issue };
        let mut state = self.state.write();
        state.config = Arc::new(config);
        state.durability = durability;
        state.loaded = true;
        state.fell_back = report.fell_back();

        Ok(report)
    }

    /// Snapshot of the current configuration
    pub fn current(&self) -> ConfigSnapshot {
        Arc::clone(&self.state.read().config)
    }

    /// Snapshot for consumers that must not see a never-loaded store
    pub fn snapshot(&self) -> Result<ConfigSnapshot, ConfigStoreError> {
        let state = self.state.read();
        if state.loaded {
            Ok(Arc::clone(&state.config))
        } else {
            Err(ConfigStoreError::Unavailable)
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    /// True while defaults stand in for a document that could not be used
    pub fn fell_back(&self) -> bool {
        self.state.read().fell_back
    }

    pub fn durability(&self) -> Durability {
        self.state.read().durability
    }

    pub fn location(&self) -> String {
        self.repository.location()
    }

    /// Validate `candidate` and, if it has no violations, make it current and
    /// persist it. Rejections leave the current configuration untouched.
    pub async fn replace(
        &self,
        candidate: AgentConfiguration,
    ) -> Result<ConfigSnapshot, ConfigStoreError> {
        let _guard = self.write_lock.lock().await;
        self.commit(candidate).await
    }

    /// Apply `edit` to the current configuration and replace with the result.
    /// The edit runs outside the write lock; if another write lands before the
    /// lock is taken, the edit is re-run against the newer configuration.
    /// A candidate equal to the current configuration is a no-op.
    pub async fn update<T, F>(&self, edit: F) -> Result<(ConfigSnapshot, T), ConfigStoreError>
    where
        F: Fn(&AgentConfiguration) -> (AgentConfiguration, T),
    {
        loop {
            let base = self.current();
            let (candidate, output) = edit(&base);

            let _guard = self.write_lock.lock().await;
            if !Arc::ptr_eq(&base, &self.current()) {
                debug!("Configuration changed while computing candidate, retrying edit");
                continue;
            }
            self.ensure_writable()?;
            if candidate == *base {
                return Ok((base, output));
            }
            let snapshot = self.commit(candidate).await?;
            return Ok((snapshot, output));
        }
    }

    /// Append a service under a freshly generated id
    pub async fn add_service(
        &self,
        name: impl Into<String>,
        service_type: ServiceType,
        details: impl Into<String>,
    ) -> Result<ServiceEntry, ConfigStoreError> {
        let name = name.into();
        let details = details.into();
        let (snapshot, id) = self
            .update(|current| current.with_service_added(name.clone(), service_type.clone(), details.clone()))
            .await?;

        snapshot
            .find_service(&id)
            .cloned()
            .ok_or(ConfigStoreError::Unavailable)
    }

    /// Remove a service by id. Unknown ids leave the configuration unchanged.
    pub async fn remove_service(&self, id: &ServiceId) -> Result<ConfigSnapshot, ConfigStoreError> {
        let (snapshot, ()) = self.update(|current| (current.without_service(id), ())).await?;
        Ok(snapshot)
    }

    /// Persist the current configuration again, e.g. after a failed write
    pub async fn sync(&self) -> Result<(), ConfigStoreError> {
        let _guard = self.write_lock.lock().await;
        self.ensure_writable()?;
        let current = self.current();
        let document = ConfigCodec::encode_yaml(&current)?;
        self.persist(&document).await
    }

    fn ensure_writable(&self) -> Result<(), ConfigStoreError> {
        if self.fell_back() {
            warn!("Refusing to overwrite configuration document at {} after fallback", self.repository.location());
            return Err(ConfigStoreError::FellBack(self.repository.location()));
        }
        Ok(())
    }

    // Caller holds `write_lock`.
    async fn commit(&self, candidate: AgentConfiguration) -> Result<ConfigSnapshot, ConfigStoreError> {
        self.ensure_writable()?;
        let violations = validate(&candidate);
        if !violations.is_empty() {
            warn!("Rejected configuration candidate with {} violation(s)", violations.len());
            for violation in &violations {
                debug!("  {}", violation);
            }
            return Err(ConfigStoreError::Validation(violations));
        }

        let document = ConfigCodec::encode_yaml(&candidate)?;
        let snapshot = Arc::new(candidate);
        {
            let mut state = self.state.write();
            state.config = Arc::clone(&snapshot);
            state.durability = Durability::Unconfirmed;
            state.loaded = true;
        }

        self.persist(&document).await?;
        info!(
            "Configuration replaced and persisted to {} ({} service(s))",
            self.repository.location(),
            snapshot.services.len()
        );
        Ok(snapshot)
    }

    async fn persist(&self, document: &str) -> Result<(), ConfigStoreError> {
        match self.repository.write(document).await {
            Ok(()) => {
                self.state.write().durability = Durability::Durable;
                Ok(())
            }
            Err(e) => {
                error!(
                    "Failed to persist configuration to {}: {}",
                    self.repository.location(),
                    e
                );
                self.state.write().durability = Durability::Unconfirmed;
                Err(ConfigStoreError::Persistence(e))
            }
        }
    }
}
