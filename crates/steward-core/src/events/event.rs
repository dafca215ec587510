//! Decoded platform events consumed by the engine.
//!
//! The event-delivery transport is an external collaborator; the engine only
//! ever sees these already-decoded records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, MessageRef, RoleId, UserId};

/// A platform event handed to the engine by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// A text message was posted.
    Message(MessageEvent),
    /// A reaction was added to a message.
    Reaction(ReactionEvent),
    /// A user's voice-channel membership changed.
    VoicePresence(VoicePresenceEvent),
}

impl PlatformEvent {
    /// Get the event type as a string for filtering and logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Message(_) => "platform.message",
            Self::Reaction(_) => "platform.reaction",
            Self::VoicePresence(_) => "platform.voice_presence",
        }
    }

    /// The user whose action produced this event.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Message(e) => e.author,
            Self::Reaction(e) => e.actor,
            Self::VoicePresence(e) => e.user,
        }
    }

    /// Get the timestamp of this event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Message(e) => e.timestamp,
            Self::Reaction(e) => e.timestamp,
            Self::VoicePresence(e) => e.timestamp,
        }
    }
}

/// A text message posted in a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Unique event ID.
    pub event_id: String,
    /// Author of the message.
    pub author: UserId,
    /// Message text.
    pub text: String,
    /// Reference to the message itself (carries the originating channel).
    pub message: MessageRef,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
}

impl MessageEvent {
    pub fn new(author: UserId, text: impl Into<String>, message: MessageRef) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            author,
            text: text.into(),
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Channel the message was posted in.
    pub fn channel(&self) -> ChannelId {
        self.message.channel
    }
}

/// A reaction added to an existing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// Unique event ID.
    pub event_id: String,
    /// Emoji that was added.
    pub emoji: String,
    /// User who added the reaction.
    pub actor: UserId,
    /// Roles held by the acting user.
    #[serde(default)]
    pub actor_roles: Vec<RoleId>,
    /// Author of the message that was reacted to.
    pub target_author: UserId,
    /// Reference to the reacted-to message.
    pub message: MessageRef,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
}

impl ReactionEvent {
    pub fn new(
        emoji: impl Into<String>,
        actor: UserId,
        target_author: UserId,
        message: MessageRef,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            emoji: emoji.into(),
            actor,
            actor_roles: Vec::new(),
            target_author,
            message,
            timestamp: Utc::now(),
        }
    }

    pub fn with_roles(mut self, roles: Vec<RoleId>) -> Self {
        self.actor_roles = roles;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A voice-presence transition: none -> channel, channel -> channel, or
/// channel -> none. Equal before/after (including both none) is a no-op for
/// the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoicePresenceEvent {
    /// Unique event ID.
    pub event_id: String,
    /// User whose presence changed.
    pub user: UserId,
    /// Channel before the transition, if any.
    pub before: Option<ChannelId>,
    /// Channel after the transition, if any.
    pub after: Option<ChannelId>,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
}

impl VoicePresenceEvent {
    pub fn new(user: UserId, before: Option<ChannelId>, after: Option<ChannelId>) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            user,
            before,
            after,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_and_user() {
        let msg = MessageEvent::new(
            UserId::new(1),
            "hello",
            MessageRef::new(10u64, 100u64),
        );
        let event = PlatformEvent::Message(msg);
        assert_eq!(event.event_type(), "platform.message");
        assert_eq!(event.user_id(), UserId::new(1));
    }

    #[test]
    fn test_tagged_serialization() {
        let event = PlatformEvent::VoicePresence(VoicePresenceEvent::new(
            UserId::new(2),
            None,
            Some(ChannelId::new(5)),
        ));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"voice_presence""#));

        let back: PlatformEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id(), UserId::new(2));
    }

    #[test]
    fn test_message_channel_accessor() {
        let msg = MessageEvent::new(UserId::new(1), "hi", MessageRef::new(10u64, 100u64));
        assert_eq!(msg.channel(), ChannelId::new(10));
    }
}
