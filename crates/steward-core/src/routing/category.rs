//! Log categories and their presentation colors.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::types::Color;

/// Category of an outbound log record. Routing and color both key off this.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogCategory {
    /// General points activity (threshold credits).
    Points,
    /// Points added by command.
    PointsAdd,
    /// Points removed by command.
    PointsRemove,
    /// Approval-reaction awards.
    Reaction,
    /// Block-list matches.
    Moderation,
    /// Leaderboard displays.
    Leaderboard,
    /// Voice channel joins.
    VoiceJoin,
    /// Voice channel switches.
    VoiceSwitch,
    /// Voice channel leaves.
    VoiceLeave,
    /// Engagement sweep notifications.
    Engagement,
    /// Everything else (startup, daily reset, point queries).
    General,
}

impl LogCategory {
    /// Presentation color for records in this category.
    pub fn color(&self) -> Color {
        match self {
            Self::Points | Self::PointsAdd | Self::VoiceJoin => Color::Green,
            Self::PointsRemove | Self::Moderation | Self::VoiceLeave => Color::Red,
            Self::Reaction => Color::Fuchsia,
            Self::Leaderboard => Color::Gold,
            Self::VoiceSwitch => Color::Yellow,
            Self::Engagement => Color::Purple,
            Self::General => Color::Blue,
        }
    }
}
