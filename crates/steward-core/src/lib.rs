//! steward-core - Core engine for the steward workspace assistant.
//!
//! This crate provides the stateful event-processing engine behind the
//! assistant: a points ledger, daily activity tracking, a moderation
//! filter, voice session tracking with chained log records, and a
//! category-routed notification layer. All state is volatile and
//! in-memory; the platform transport is abstracted behind the
//! [`NotificationSurface`] trait.
//!
//! # Example
//!
//! ```ignore
//! use steward_core::{Engine, EngineConfig, PlatformEvent, SweepRuntime};
//! use std::sync::Arc;
//!
//! # async fn example(surface: Arc<dyn steward_core::NotificationSurface>) -> steward_core::StewardResult<()> {
//! let engine = Arc::new(Engine::new(EngineConfig::from_env(), surface));
//! engine.announce_started().await;
//!
//! let runtime = SweepRuntime::new(engine.clone()).await?;
//! runtime.start().await?;
//!
//! let (tx, rx) = tokio::sync::mpsc::channel::<PlatformEvent>(256);
//! let loop_handle = engine.start(rx);
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod moderation;
pub mod routing;
pub mod runtime;
pub mod traits;
pub mod types;
pub mod voice;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{StewardError, StewardResult};
pub use events::{MessageEvent, PlatformEvent, ReactionEvent, VoicePresenceEvent};
pub use routing::{LogCategory, Router, RoutingTable};
pub use runtime::SweepRuntime;
pub use traits::NotificationSurface;
pub use types::{
    ChannelId, Color, DestinationId, LogField, LogRecord, MessageRef, RecordId, RoleId, UserId,
};
