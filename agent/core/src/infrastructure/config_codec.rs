// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agent Configuration Document Codec
//!
//! Converts between the persisted YAML document and the in-memory
//! [`AgentConfiguration`], in both directions.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Parse external YAML → Domain objects and back
//! - **Anti-Corruption:** Legacy field names and missing sections stop here
//!
//! # Document Format
//!
//! ```yaml
//! server_timezone: Europe/London
//! maintenance_window:
//!   days: [Saturday, Sunday]
//!   start_time: "22:00"
//!   end_time: "02:00"
//! services:
//!   - id: svc-0
//!     name: api-server
//!     type: docker
//!     container_name: my-app-container
//! notifications:
//!   method: slack
//!   contact: https://hooks.slack.com/services/T000/B000/XXXX
//!   notify_on_warning: true
//! security:
//!   allowed_actions: [restart_service, trigger_backup]
//!   credential_reference: /etc/sentinel/id_ed25519
//! ```
//!
//! `services[].id`, `notifications.notify_on_warning` and
//! `security.credential_reference` are extension fields written by this
//! codec; older documents do not have them.
//!
//! # Decoding rules
//!
//! - A service locator is read from the first key present in
//!   [`LOCATOR_ALIASES`] (`container_name`, `health_check`, `host`). A key
//!   counts as present when it is set, even to an empty string. With none
//!   present the locator is [`LOCATOR_PLACEHOLDER`].
//! - Absent sections take their defaults: empty days, `00:00`-`00:00`,
//!   `UTC`; email with empty destination and warnings on; no remediation
//!   grants; empty credential reference. Empty `server_timezone` and
//!   `method` count as absent.
//! - Services without an id get `svc-<index>`; colliding ids are suffixed
//!   (`svc-1-2`) so ids are unique within the decoded list. A service without
//!   a name is named after its id; one without a type is `docker`.
//! - Only input that is not YAML, or not shaped like the document (wrong
//!   value kinds, non-mapping top level), is rejected.
//!
//! Encoding writes the canonical form only: `host` for static services and
//! `container_name` for every other type.

use crate::domain::config::{
    AgentConfiguration, NotificationChannel, NotificationPolicy, RemediationAction,
    RemediationPolicy, ServiceEntry, ServiceId, ServiceType,
};
use crate::domain::maintenance::{MaintenanceWindow, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Locator used when a service names none of the known locator fields.
/// Kept verbatim from the documents this format was inherited from.
pub const LOCATOR_PLACEHOLDER: &str = "check config";

const DEFAULT_TIMEZONE: &str = "UTC";
const DEFAULT_TIME: &str = "00:00";

// ============================================================================
// Persisted document shape
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_timezone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<WindowSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceSection>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<SecuritySection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_warning: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecuritySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_actions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_reference: Option<String>,
}

/// Document fields a service locator can be stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorField {
    ContainerName,
    HealthCheck,
    Host,
}

/// Decode priority for the service locator, first present wins
pub const LOCATOR_ALIASES: [LocatorField; 3] = [
    LocatorField::ContainerName,
    LocatorField::HealthCheck,
    LocatorField::Host,
];

impl ServiceSection {
    fn locator_field(&self, field: LocatorField) -> Option<&String> {
        match field {
            LocatorField::ContainerName => self.container_name.as_ref(),
            LocatorField::HealthCheck => self.health_check.as_ref(),
            LocatorField::Host => self.host.as_ref(),
        }
    }

    fn locator(&self) -> String {
        LOCATOR_ALIASES
            .iter()
            .find_map(|field| self.locator_field(*field))
            .cloned()
            .unwrap_or_else(|| LOCATOR_PLACEHOLDER.to_string())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed configuration document: {0}")]
    MalformedDocument(String),

    #[error("Failed to serialize configuration document: {0}")]
    Serialization(String),
}

// ============================================================================
// Codec API
// ============================================================================

pub struct ConfigCodec;

impl ConfigCodec {
    /// Parse document text into its persisted shape
    pub fn parse_document(text: &str) -> Result<ConfigDocument, CodecError> {
        if text.trim().is_empty() {
            return Ok(ConfigDocument::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| CodecError::MalformedDocument(e.to_string()))?;

        // `from_value` would reject plain scalars such as `container_name: 8080`
        // in string fields; deserializing from the text reads them as strings.
        match value {
            serde_yaml::Value::Null => Ok(ConfigDocument::default()),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_str::<ConfigDocument>(text)
                .map_err(|e| CodecError::MalformedDocument(e.to_string())),
            _ => Err(CodecError::MalformedDocument(
                "expected a mapping at the top level of the document".to_string(),
            )),
        }
    }

    /// Decode document text into a fully populated configuration
    pub fn decode(text: &str) -> Result<AgentConfiguration, CodecError> {
        Ok(Self::decode_document(Self::parse_document(text)?))
    }

    /// Map a parsed document onto the domain model, defaulting everything absent
    pub fn decode_document(document: ConfigDocument) -> AgentConfiguration {
        let window = document.maintenance_window.unwrap_or_default();
        let maintenance_window = MaintenanceWindow {
            days: window
                .days
                .unwrap_or_default()
                .iter()
                .map(|d| Weekday::parse(d))
                .collect(),
            start_time: window.start_time.unwrap_or_else(|| DEFAULT_TIME.to_string()),
            end_time: window.end_time.unwrap_or_else(|| DEFAULT_TIME.to_string()),
            timezone: document
                .server_timezone
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        };

        let services = Self::decode_services(document.services.unwrap_or_default());

        let notifications = match document.notifications {
            Some(section) => NotificationPolicy {
                channel: section
                    .method
                    .filter(|m| !m.is_empty())
                    .map(NotificationChannel::from)
                    .unwrap_or_default(),
                destination: section.contact.unwrap_or_default(),
                notify_on_warning: section.notify_on_warning.unwrap_or(true),
            },
            None => NotificationPolicy::default(),
        };

        let security = document.security.unwrap_or_default();
        let mut auto_remediation = RemediationPolicy::default();
        for name in security.allowed_actions.unwrap_or_default() {
            match RemediationAction::parse(&name) {
                Some(action) => auto_remediation.set(action, true),
                None => warn!("Ignoring unknown remediation action '{}' in allowed_actions", name),
            }
        }

        AgentConfiguration {
            maintenance_window,
            services,
            notifications,
            auto_remediation,
            credential_reference: security.credential_reference.unwrap_or_default(),
        }
    }

    fn decode_services(sections: Vec<ServiceSection>) -> Vec<ServiceEntry> {
        // Explicit ids keep their first occurrence; everything else is
        // assigned afterwards so a positional id never steals an explicit one.
        let mut taken: HashSet<String> = HashSet::new();
        let mut ids: Vec<Option<ServiceId>> = sections
            .iter()
            .map(|s| {
                let id = s.id.as_deref().filter(|id| !id.is_empty())?;
                taken.insert(id.to_string()).then(|| ServiceId::from(id))
            })
            .collect();

        for (index, slot) in ids.iter_mut().enumerate() {
            if slot.is_some() {
                continue;
            }
            let base = match sections[index].id.as_deref() {
                Some(explicit) if !explicit.is_empty() => {
                    warn!("Duplicate service id '{}' in document, reassigning", explicit);
                    explicit.to_string()
                }
                _ => ServiceId::positional(index).0,
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{base}-{suffix}");
                suffix += 1;
            }
            taken.insert(candidate.clone());
            *slot = Some(ServiceId(candidate));
        }

        sections
            .into_iter()
            .zip(ids)
            .map(|(section, id)| {
                let id = id.unwrap_or_else(ServiceId::generate);
                let details = section.locator();
                ServiceEntry {
                    name: section
                        .name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| id.to_string()),
                    service_type: section
                        .service_type
                        .map(ServiceType::from)
                        .unwrap_or(ServiceType::Docker),
                    details,
                    id,
                }
            })
            .collect()
    }

    /// Canonical document for a configuration. Total and deterministic.
    pub fn encode(config: &AgentConfiguration) -> ConfigDocument {
        let window = &config.maintenance_window;

        let services = config
            .services
            .iter()
            .map(|service| {
                let mut section = ServiceSection {
                    id: Some(service.id.to_string()),
                    name: Some(service.name.clone()),
                    service_type: Some(service.service_type.to_string()),
                    ..Default::default()
                };
                match service.service_type {
                    ServiceType::Static => section.host = Some(service.details.clone()),
                    _ => section.container_name = Some(service.details.clone()),
                }
                section
            })
            .collect();

        let credential = &config.credential_reference;

        ConfigDocument {
            server_timezone: Some(window.timezone.clone()),
            maintenance_window: Some(WindowSection {
                days: Some(window.days.iter().map(|d| d.to_string()).collect()),
                start_time: Some(window.start_time.clone()),
                end_time: Some(window.end_time.clone()),
            }),
            services: Some(services),
            notifications: Some(NotificationSection {
                method: Some(config.notifications.channel.to_string()),
                contact: Some(config.notifications.destination.clone()),
                notify_on_warning: Some(config.notifications.notify_on_warning),
            }),
            security: Some(SecuritySection {
                allowed_actions: Some(
                    config
                        .auto_remediation
                        .granted()
                        .iter()
                        .map(|a| a.as_str().to_string())
                        .collect(),
                ),
                credential_reference: (!credential.is_empty()).then(|| credential.clone()),
            }),
        }
    }

    /// Encode a configuration to YAML text
    pub fn encode_yaml(config: &AgentConfiguration) -> Result<String, CodecError> {
        serde_yaml::to_string(&Self::encode(config))
            .map_err(|e| CodecError::Serialization(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
