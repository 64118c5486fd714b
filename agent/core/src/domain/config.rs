// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Configuration Aggregate
//!
//! In-memory model of everything the host-maintenance agent is allowed to do:
//!
//! | Type | Description |
//! |------|-------------|
//! | `MaintenanceWindow` | Days, start/end time and timezone in which remediation may run |
//! | `ServiceEntry` | A monitored workload and its type-specific locator |
//! | `NotificationPolicy` | Alert channel, destination and warning gate |
//! | `RemediationPolicy` | Four independent autonomous-action grants |
//! | `AgentConfiguration` | Aggregate root owning one of each plus the credential reference |
//!
//! Closed sets (`ServiceType`, `NotificationChannel`, `Weekday`) keep values
//! they do not recognise in an `Unrecognized` variant so that validation can
//! report them instead of a decoder silently coercing them.
//!
//! The aggregate is always fully populated. Consumers outside the store only
//! ever hold copies.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::domain::maintenance::{MaintenanceWindow, Weekday};

/// Shown instead of a sensitive value that is set.
pub const MASKED_VALUE: &str = "*******";
/// Shown instead of a sensitive value that is empty.
pub const UNSET_VALUE: &str = "Not Set";

/// Masks a sensitive string for logs and previews.
pub fn mask_secret(value: &str) -> &'static str {
    if value.is_empty() {
        UNSET_VALUE
    } else {
        MASKED_VALUE
    }
}

// ============================================================================
// Service entries
// ============================================================================

/// Identifier of a service entry, unique within the service list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    /// Fresh identifier for a newly added entry. Never collides with the
    /// positional ids assigned by the decoder.
    pub fn generate() -> Self {
        Self(format!("svc-{}", uuid::Uuid::new_v4().simple()))
    }

    /// Positional identifier for an entry decoded without an explicit id
    pub fn positional(index: usize) -> Self {
        Self(format!("svc-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    Docker,
    Systemd,
    Kubernetes,
    Static,
    Unrecognized(String),
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Docker,
        ServiceType::Systemd,
        ServiceType::Kubernetes,
        ServiceType::Static,
    ];

    pub fn parse(value: &str) -> Self {
        match value {
            "docker" => Self::Docker,
            "systemd" => Self::Systemd,
            "kubernetes" => Self::Kubernetes,
            "static" => Self::Static,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Docker => "docker",
            Self::Systemd => "systemd",
            Self::Kubernetes => "kubernetes",
            Self::Static => "static",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitored workload reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub id: ServiceId,

    /// Display label, must not be empty
    pub name: String,

    #[serde(rename = "type")]
    pub service_type: ServiceType,

    /// Container name, unit name, deployment ref or host:port depending on type
    pub details: String,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationChannel {
    Slack,
    Email,
    Pagerduty,
    Unrecognized(String),
}

impl NotificationChannel {
    pub fn parse(value: &str) -> Self {
        match value {
            "slack" => Self::Slack,
            "email" => Self::Email,
            "pagerduty" => Self::Pagerduty,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Slack => "slack",
            Self::Email => "email",
            Self::Pagerduty => "pagerduty",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::Email
    }
}

impl From<String> for NotificationChannel {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<NotificationChannel> for String {
    fn from(value: NotificationChannel) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPolicy {
    pub channel: NotificationChannel,

    /// Webhook URL, address or routing key. Sensitive.
    pub destination: String,

    /// Whether non-critical alerts are sent
    pub notify_on_warning: bool,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            channel: NotificationChannel::Email,
            destination: String::new(),
            notify_on_warning: true,
        }
    }
}

impl fmt::Debug for NotificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationPolicy")
            .field("channel", &self.channel)
            .field("destination", &mask_secret(&self.destination))
            .field("notify_on_warning", &self.notify_on_warning)
            .finish()
    }
}

// ============================================================================
// Remediation
// ============================================================================

/// Autonomous corrective actions the agent can be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemediationAction {
    RestartService,
    TriggerBackup,
    ApplyPatches,
    ScaleInstances,
}

impl RemediationAction {
    pub const ALL: [RemediationAction; 4] = [
        RemediationAction::RestartService,
        RemediationAction::TriggerBackup,
        RemediationAction::ApplyPatches,
        RemediationAction::ScaleInstances,
    ];

    /// Name used in the persisted `allowed_actions` list
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RestartService => "restart_service",
            Self::TriggerBackup => "trigger_backup",
            Self::ApplyPatches => "apply_patches",
            Self::ScaleInstances => "scale_instances",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == value)
    }
}

impl fmt::Display for RemediationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four independent grants; none implies another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationPolicy {
    pub restart_service: bool,
    pub trigger_backup: bool,
    pub apply_patches: bool,
    pub scale_instances: bool,
}

impl RemediationPolicy {
    pub fn allows(&self, action: RemediationAction) -> bool {
        match action {
            RemediationAction::RestartService => self.restart_service,
            RemediationAction::TriggerBackup => self.trigger_backup,
            RemediationAction::ApplyPatches => self.apply_patches,
            RemediationAction::ScaleInstances => self.scale_instances,
        }
    }

    pub fn set(&mut self, action: RemediationAction, allowed: bool) {
        let flag = match action {
            RemediationAction::RestartService => &mut self.restart_service,
            RemediationAction::TriggerBackup => &mut self.trigger_backup,
            RemediationAction::ApplyPatches => &mut self.apply_patches,
            RemediationAction::ScaleInstances => &mut self.scale_instances,
        };
        *flag = allowed;
    }

    /// Granted actions in canonical order
    pub fn granted(&self) -> Vec<RemediationAction> {
        RemediationAction::ALL
            .into_iter()
            .filter(|action| self.allows(*action))
            .collect()
    }
}

// ============================================================================
// Aggregate root
// ============================================================================

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfiguration {
    pub maintenance_window: MaintenanceWindow,
    pub services: Vec<ServiceEntry>,
    pub notifications: NotificationPolicy,
    pub auto_remediation: RemediationPolicy,

    /// Where the execution credential lives (key path or role id), never the
    /// credential itself. Empty means unset.
    pub credential_reference: String,
}

impl AgentConfiguration {
    pub fn find_service(&self, id: &ServiceId) -> Option<&ServiceEntry> {
        self.services.iter().find(|s| &s.id == id)
    }

    /// Candidate with one more service appended under a freshly generated id.
    pub fn with_service_added(
        &self,
        name: impl Into<String>,
        service_type: ServiceType,
        details: impl Into<String>,
    ) -> (Self, ServiceId) {
        let id = ServiceId::generate();
        let mut candidate = self.clone();
        candidate.services.push(ServiceEntry {
            id: id.clone(),
            name: name.into(),
            service_type,
            details: details.into(),
        });
        (candidate, id)
    }

    /// Candidate without the given service. Unknown ids yield an unchanged copy.
    pub fn without_service(&self, id: &ServiceId) -> Self {
        let mut candidate = self.clone();
        candidate.services.retain(|s| &s.id != id);
        candidate
    }

    /// Copy safe to hand to logs, previews and external generators: the
    /// destination and credential reference are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.notifications.destination = mask_secret(&self.notifications.destination).to_string();
        copy.credential_reference = mask_secret(&self.credential_reference).to_string();
        copy
    }
}

impl fmt::Debug for AgentConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfiguration")
            .field("maintenance_window", &self.maintenance_window)
            .field("services", &self.services)
            .field("notifications", &self.notifications)
            .field("auto_remediation", &self.auto_remediation)
            .field("credential_reference", &mask_secret(&self.credential_reference))
            .finish()
    }
}
