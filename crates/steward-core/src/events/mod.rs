//! Inbound platform events.

mod event;

pub use event::*;
