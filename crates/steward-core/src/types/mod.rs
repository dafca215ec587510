//! Core types for steward.

mod ids;
mod record;

pub use ids::*;
pub use record::*;
