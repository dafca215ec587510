//! Notification-surface trait.
//!
//! The actual delivery mechanism (chat platform, webhook, test double) lives
//! outside the core. The engine treats every call as best-effort: failures
//! are logged and the state transition proceeds without the optional
//! side effect.

use async_trait::async_trait;

use crate::error::StewardResult;
use crate::types::{ChannelId, DestinationId, LogRecord, MessageRef, RecordId, RoleId};

/// Outbound surface the engine publishes through.
///
/// `publish` must return a durable record identifier on success; the engine
/// retains it for log-chain cross-referencing. Implementations are expected
/// to bound their own waits - the engine applies no internal timeout and
/// treats any failure as non-fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    /// Publish a formatted record to a log destination.
    async fn publish(
        &self,
        destination: DestinationId,
        record: LogRecord,
    ) -> StewardResult<RecordId>;

    /// Send a user-facing record to an ordinary channel (confirmations in
    /// the channel an event originated from).
    async fn send_message(&self, channel: ChannelId, record: LogRecord) -> StewardResult<RecordId>;

    /// Retract (delete) an existing platform message.
    async fn retract_message(&self, message: MessageRef) -> StewardResult<()>;

    /// Whether a role currently resolves on the platform.
    async fn role_exists(&self, role: RoleId) -> bool;
}
