//! Collaborator seams for steward.

mod surface;

pub use surface::*;
