// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Advisor Service - Application Layer
//
// Pairs the configuration store with an advisor gateway. The gateway only
// ever receives a snapshot taken from `ConfigStore::current`, which is valid
// by construction.

use crate::application::config_store::ConfigStore;
use crate::domain::advisor::{AdvisorError, AdvisorGateway};
use std::sync::Arc;
use tracing::info;

pub struct AdvisorService {
    store: Arc<ConfigStore>,
    gateway: Arc<dyn AdvisorGateway>,
}

impl AdvisorService {
    pub fn new(store: Arc<ConfigStore>, gateway: Arc<dyn AdvisorGateway>) -> Self {
        Self { store, gateway }
    }

    /// Advisory text for `utterance` against the current configuration
    pub async fn ask(&self, utterance: &str) -> Result<String, AdvisorError> {
        let snapshot = self.store.current();
        info!(
            "Advisor request ({} chars) against {} service(s)",
            utterance.len(),
            snapshot.services.len()
        );
        self.gateway.advise(utterance, &snapshot).await
    }
}
