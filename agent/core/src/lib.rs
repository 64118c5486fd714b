// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Configuration core of the Sentinel host-maintenance agent: the
//! configuration model and its validation, the YAML document codec, the
//! single-owner configuration store, and the advisor and HTTP surfaces built
//! on top of it.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Implements lib

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
