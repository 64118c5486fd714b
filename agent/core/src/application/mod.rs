// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod advisor;
pub mod config_store;
pub mod repository_factory;
pub mod summary;

pub use advisor::AdvisorService;
pub use config_store::{ConfigSnapshot, ConfigStore, ConfigStoreError, Durability, LoadIssue, LoadReport};
pub use summary::ConfigSummary;
