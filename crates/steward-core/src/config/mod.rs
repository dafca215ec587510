//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::types::{DestinationId, RoleId};

fn default_daily_message_threshold() -> u32 {
    10
}

fn default_daily_message_credit() -> f64 {
    0.5
}

fn default_moderation_penalty() -> f64 {
    10.0
}

fn default_approval_emoji() -> String {
    "\u{2705}".to_string()
}

fn default_approval_credit() -> f64 {
    2.0
}

fn default_engagement_interval_minutes() -> u64 {
    20
}

fn default_daily_reset_hours() -> u64 {
    24
}

/// Configuration for the event-processing engine.
///
/// Every knob carries a usable default; the routing table itself is mutated
/// at runtime through the engine, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Destination used for any category without an explicit mapping.
    pub primary_destination: DestinationId,
    /// Daily message count at which the one-shot credit fires.
    pub daily_message_threshold: u32,
    /// Ledger credit awarded when the daily threshold is crossed.
    pub daily_message_credit: f64,
    /// Ledger deduction applied on a moderation match.
    pub moderation_penalty: f64,
    /// Terms matched case-insensitively against message text.
    pub block_list: Vec<String>,
    /// Reaction emoji that awards points when added by a moderator.
    pub approval_emoji: String,
    /// Ledger credit awarded to the message author on an approval reaction.
    pub approval_credit: f64,
    /// Roles whose approval reactions count.
    pub moderator_roles: Vec<RoleId>,
    /// Sweep cadence and continuous-presence threshold for engagement
    /// notifications, in minutes.
    pub engagement_interval_minutes: u64,
    /// Fire the engagement notification at most once per session. Off by
    /// default, in which case it re-fires every sweep cycle once past the
    /// threshold.
    pub engagement_fire_once: bool,
    /// Role mentioned in engagement notifications; the sweep is inert
    /// without one.
    pub engagement_role: Option<RoleId>,
    /// Hours between daily activity resets.
    pub daily_reset_hours: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_destination: DestinationId::new(0),
            daily_message_threshold: default_daily_message_threshold(),
            daily_message_credit: default_daily_message_credit(),
            moderation_penalty: default_moderation_penalty(),
            block_list: Vec::new(),
            approval_emoji: default_approval_emoji(),
            approval_credit: default_approval_credit(),
            moderator_roles: Vec::new(),
            engagement_interval_minutes: default_engagement_interval_minutes(),
            engagement_fire_once: false,
            engagement_role: None,
            daily_reset_hours: default_daily_reset_hours(),
        }
    }
}

impl EngineConfig {
    pub fn new(primary_destination: DestinationId) -> Self {
        Self {
            primary_destination,
            ..Default::default()
        }
    }

    /// Builder: set the block list.
    pub fn with_block_list(mut self, terms: Vec<String>) -> Self {
        self.block_list = terms;
        self
    }

    /// Builder: set the moderator roles.
    pub fn with_moderator_roles(mut self, roles: Vec<RoleId>) -> Self {
        self.moderator_roles = roles;
        self
    }

    /// Builder: set the engagement role.
    pub fn with_engagement_role(mut self, role: RoleId) -> Self {
        self.engagement_role = Some(role);
        self
    }

    /// Builder: set the engagement interval in minutes (minimum 1).
    pub fn with_engagement_interval(mut self, minutes: u64) -> Self {
        self.engagement_interval_minutes = minutes.max(1);
        self
    }

    /// Builder: fire the engagement notification once per session.
    pub fn with_engagement_fire_once(mut self) -> Self {
        self.engagement_fire_once = true;
        self
    }

    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `STEWARD_PRIMARY_DESTINATION`
    /// - `STEWARD_DAILY_MESSAGE_THRESHOLD` (default: 10)
    /// - `STEWARD_BLOCK_LIST` (comma-separated)
    /// - `STEWARD_ENGAGEMENT_INTERVAL_MINUTES` (default: 20)
    /// - `STEWARD_ENGAGEMENT_FIRE_ONCE` (default: off)
    /// - `STEWARD_ENGAGEMENT_ROLE`
    /// - `STEWARD_DAILY_RESET_HOURS` (default: 24)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("STEWARD_PRIMARY_DESTINATION") {
            if let Ok(id) = raw.parse() {
                config.primary_destination = DestinationId::new(id);
            }
        }

        if let Ok(raw) = std::env::var("STEWARD_DAILY_MESSAGE_THRESHOLD") {
            if let Ok(threshold) = raw.parse() {
                config.daily_message_threshold = threshold;
            }
        }

        if let Ok(raw) = std::env::var("STEWARD_BLOCK_LIST") {
            config.block_list = raw
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }

        if let Ok(raw) = std::env::var("STEWARD_ENGAGEMENT_INTERVAL_MINUTES") {
            if let Ok(minutes) = raw.parse::<u64>() {
                config.engagement_interval_minutes = minutes.max(1);
            }
        }

        if std::env::var("STEWARD_ENGAGEMENT_FIRE_ONCE").is_ok() {
            config.engagement_fire_once = true;
        }

        if let Ok(raw) = std::env::var("STEWARD_ENGAGEMENT_ROLE") {
            if let Ok(id) = raw.parse() {
                config.engagement_role = Some(RoleId::new(id));
            }
        }

        if let Ok(raw) = std::env::var("STEWARD_DAILY_RESET_HOURS") {
            if let Ok(hours) = raw.parse() {
                config.daily_reset_hours = hours;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.daily_message_threshold, 10);
        assert_eq!(config.daily_message_credit, 0.5);
        assert_eq!(config.moderation_penalty, 10.0);
        assert_eq!(config.approval_credit, 2.0);
        assert_eq!(config.approval_emoji, "\u{2705}");
        assert!(!config.engagement_fire_once);
        assert_eq!(config.daily_reset_hours, 24);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::new(DestinationId::new(7))
            .with_block_list(vec!["badword".to_string()])
            .with_engagement_role(RoleId::new(3))
            .with_engagement_interval(0)
            .with_engagement_fire_once();

        assert_eq!(config.primary_destination, DestinationId::new(7));
        assert_eq!(config.block_list.len(), 1);
        assert_eq!(config.engagement_role, Some(RoleId::new(3)));
        assert_eq!(config.engagement_interval_minutes, 1);
        assert!(config.engagement_fire_once);
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: EngineConfig = serde_json::from_str(r#"{"moderation_penalty": 5.0}"#).unwrap();
        assert_eq!(config.moderation_penalty, 5.0);
        assert_eq!(config.daily_message_threshold, 10);
    }
}
