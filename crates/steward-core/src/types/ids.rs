//! Identifier newtypes.
//!
//! All platform identifiers are opaque u64 snowflakes. Wrapping them keeps
//! user/channel/role/destination ids from being swapped at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw platform id.
            pub fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw platform id.
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// A platform user.
    UserId
);
id_type!(
    /// A text or voice channel.
    ChannelId
);
id_type!(
    /// A platform role.
    RoleId
);
id_type!(
    /// An outbound log destination.
    DestinationId
);
id_type!(
    /// Durable identifier of a published record, returned by the
    /// notification surface and used for log-chain cross-references.
    RecordId
);

/// Reference to an existing platform message: enough to retract it and to
/// render a jump link in log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    /// Channel the message lives in.
    pub channel: ChannelId,
    /// The message's own id.
    pub message: RecordId,
}

impl MessageRef {
    pub fn new(channel: impl Into<ChannelId>, message: impl Into<RecordId>) -> Self {
        Self {
            channel: channel.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_raw() {
        let user = UserId::new(12345);
        assert_eq!(user.raw(), 12345);
        assert_eq!(user.to_string(), "12345");
    }

    #[test]
    fn test_message_ref_display() {
        let msg = MessageRef::new(7u64, 99u64);
        assert_eq!(msg.to_string(), "7/99");
    }

    #[test]
    fn test_serde_transparent() {
        let channel = ChannelId::new(42);
        let json = serde_json::to_string(&channel).unwrap();
        assert_eq!(json, "42");
        let back: ChannelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, channel);
    }
}
