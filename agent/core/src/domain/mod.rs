// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Domain model of the host-maintenance agent configuration.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Configuration aggregate, validation rules and the
//!   persistence/advisor contracts the outer layers implement

pub mod advisor;
pub mod config;
pub mod llm;
pub mod maintenance;
pub mod node_config;
pub mod repository;
pub mod validation;
