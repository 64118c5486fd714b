// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Dashboard summary of a configuration snapshot, plus the YAML preview shown
// next to it. The preview goes through `redacted()` so it can be displayed or
// logged without exposing the destination or credential reference.

use crate::domain::config::{AgentConfiguration, RemediationAction};
use crate::infrastructure::config_codec::{CodecError, ConfigCodec};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub services: usize,
    pub remediation_enabled: usize,
    pub remediation_total: usize,
    pub window_start: String,
    pub notification_channel: String,
    pub preview: String,
}

impl ConfigSummary {
    pub fn from_config(config: &AgentConfiguration) -> Result<Self, CodecError> {
        Ok(Self {
            services: config.services.len(),
            remediation_enabled: config.auto_remediation.granted().len(),
            remediation_total: RemediationAction::ALL.len(),
            window_start: config.maintenance_window.start_time.clone(),
            notification_channel: config.notifications.channel.to_string(),
            preview: redacted_preview(config)?,
        })
    }
}

/// Persisted-document YAML with secrets masked
pub fn redacted_preview(config: &AgentConfiguration) -> Result<String, CodecError> {
    ConfigCodec::encode_yaml(&config.redacted())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{NotificationChannel, ServiceType, MASKED_VALUE, UNSET_VALUE};

    #[test]
    fn test_summary_counts() {
        let mut config = AgentConfiguration::default();
        config.maintenance_window.start_time = "02:00".into();
        config.notifications.channel = NotificationChannel::Slack;
        config.auto_remediation.set(RemediationAction::RestartService, true);
        config.auto_remediation.set(RemediationAction::TriggerBackup, true);
        let (config, _) = config.with_service_added("api", ServiceType::Docker, "api");

        let summary = ConfigSummary::from_config(&config).unwrap();
        assert_eq!(summary.services, 1);
        assert_eq!(summary.remediation_enabled, 2);
        assert_eq!(summary.remediation_total, 4);
        assert_eq!(summary.window_start, "02:00");
        assert_eq!(summary.notification_channel, "slack");
    }

    #[test]
    fn test_preview_masks_secrets() {
        let mut config = AgentConfiguration::default();
        config.notifications.destination = "https://hooks.slack.com/T000/B000".into();

        let preview = redacted_preview(&config).unwrap();
        assert!(!preview.contains("hooks.slack.com"));
        assert!(preview.contains(MASKED_VALUE));
        assert!(preview.contains(UNSET_VALUE));
    }
}
