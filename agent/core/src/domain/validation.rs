// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Configuration Validation
//!
//! `validate` is the single predicate deciding whether an
//! [`AgentConfiguration`] may become the current configuration. It collects
//! every violation instead of stopping at the first so a caller can report
//! everything in one round trip. It has no side effects.
//!
//! ## Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `maintenanceWindow.days[]` | one of the seven canonical weekday names |
//! | `maintenanceWindow.startTime` / `endTime` | `HH:MM` in [00:00, 23:59], each on its own; end before start is allowed |
//! | `maintenanceWindow.timezone` | non-empty, no whitespace or control characters |
//! | `services[i].id` | non-empty, unique across the list |
//! | `services[i].name` | non-empty |
//! | `services[i].type` | docker, systemd, kubernetes or static |
//! | `notifications.channel` | slack, email or pagerduty |
//! | `notifications.destination`, `credentialReference` | may be empty, no control characters |

use crate::domain::config::AgentConfiguration;
use crate::domain::maintenance::parse_time_of_day;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One broken rule, addressed by field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path of the offending field, e.g. `notifications.channel` or `services[2].id`
    pub field: String,
    pub message: String,
}

impl Violation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn has_control_chars(value: &str) -> bool {
    value.chars().any(char::is_control)
}

/// Returns every rule the configuration violates; empty means valid.
pub fn validate(config: &AgentConfiguration) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Maintenance window
    let window = &config.maintenance_window;
    for day in window.days.iter().filter(|d| !d.is_recognized()) {
        violations.push(Violation::new(
            "maintenanceWindow.days",
            format!("'{day}' is not a weekday (expected Monday..Sunday)"),
        ));
    }
    for (field, value) in [
        ("maintenanceWindow.startTime", &window.start_time),
        ("maintenanceWindow.endTime", &window.end_time),
    ] {
        if parse_time_of_day(value).is_none() {
            violations.push(Violation::new(
                field,
                format!("'{value}' is not a 24-hour HH:MM time between 00:00 and 23:59"),
            ));
        }
    }
    if window.timezone.is_empty() {
        violations.push(Violation::new(
            "maintenanceWindow.timezone",
            "timezone must not be empty",
        ));
    } else if window
        .timezone
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        violations.push(Violation::new(
            "maintenanceWindow.timezone",
            "timezone must be an IANA identifier without whitespace",
        ));
    }

    // Services
    let mut first_index: HashMap<&str, usize> = HashMap::new();
    for (index, service) in config.services.iter().enumerate() {
        let prefix = format!("services[{index}]");

        if service.id.as_str().is_empty() {
            violations.push(Violation::new(format!("{prefix}.id"), "id must not be empty"));
        } else if let Some(first) = first_index.get(service.id.as_str()) {
            violations.push(Violation::new(
                format!("{prefix}.id"),
                format!("duplicate service id '{}' (first used by services[{first}])", service.id),
            ));
        } else {
            first_index.insert(service.id.as_str(), index);
        }

        if service.name.trim().is_empty() {
            violations.push(Violation::new(format!("{prefix}.name"), "name must not be empty"));
        }

        if !service.service_type.is_recognized() {
            violations.push(Violation::new(
                format!("{prefix}.type"),
                format!(
                    "unrecognized service type '{}' (expected docker, systemd, kubernetes or static)",
                    service.service_type
                ),
            ));
        }
    }

    // Notifications
    if !config.notifications.channel.is_recognized() {
        violations.push(Violation::new(
            "notifications.channel",
            format!(
                "unrecognized channel '{}' (expected slack, email or pagerduty)",
                config.notifications.channel
            ),
        ));
    }
    if has_control_chars(&config.notifications.destination) {
        violations.push(Violation::new(
            "notifications.destination",
            "destination must not contain control characters",
        ));
    }

    if has_control_chars(&config.credential_reference) {
        violations.push(Violation::new(
            "credentialReference",
            "credential reference must not contain control characters",
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{NotificationChannel, ServiceEntry, ServiceId, ServiceType};
    use crate::domain::maintenance::Weekday;

    fn service(id: &str, name: &str) -> ServiceEntry {
        ServiceEntry {
            id: ServiceId::from(id),
            name: name.to_string(),
            service_type: ServiceType::Docker,
            details: "container".to_string(),
        }
    }

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(validate(&AgentConfiguration::default()).is_empty());
    }

    #[test]
    fn test_wrapping_window_is_valid() {
        let mut config = AgentConfiguration::default();
        config.maintenance_window.start_time = "22:00".to_string();
        config.maintenance_window.end_time = "02:00".to_string();
        config.maintenance_window.days.insert(Weekday::Friday);
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn test_unrecognized_channel_is_single_violation() {
        let mut config = AgentConfiguration::default();
        config.notifications.channel = NotificationChannel::parse("carrier-pigeon");

        let violations = validate(&config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "notifications.channel");
        assert!(violations[0].message.contains("carrier-pigeon"));
    }

    #[test]
    fn test_duplicate_service_id_is_named() {
        let mut config = AgentConfiguration::default();
        config.services = vec![service("svc-1", "api"), service("svc-1", "worker")];

        let violations = validate(&config);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "services[1].id");
        assert!(violations[0].message.contains("svc-1"));
    }

    #[test]
    fn test_collects_every_violation() {
        let mut config = AgentConfiguration::default();
        config.maintenance_window.days.insert(Weekday::parse("Funday"));
        config.maintenance_window.start_time = "25:00".to_string();
        config.maintenance_window.end_time = "2pm".to_string();
        config.maintenance_window.timezone = String::new();
        config.services = vec![ServiceEntry {
            id: ServiceId::from(""),
            name: " ".to_string(),
            service_type: ServiceType::parse("lambda"),
            details: String::new(),
        }];
        config.notifications.channel = NotificationChannel::parse("sms");
        config.notifications.destination = "ops\n@example.com".to_string();
        config.credential_reference = "/keys/\u{7}bell".to_string();

        let fields: Vec<String> = validate(&config).into_iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                "maintenanceWindow.days",
                "maintenanceWindow.startTime",
                "maintenanceWindow.endTime",
                "maintenanceWindow.timezone",
                "services[0].id",
                "services[0].name",
                "services[0].type",
                "notifications.channel",
                "notifications.destination",
                "credentialReference",
            ]
        );
    }

    #[test]
    fn test_empty_sensitive_fields_are_allowed() {
        let mut config = AgentConfiguration::default();
        config.notifications.destination = String::new();
        config.credential_reference = String::new();
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::new("notifications.channel", "unrecognized channel 'sms'");
        assert_eq!(v.to_string(), "notifications.channel: unrecognized channel 'sms'");
    }
}
