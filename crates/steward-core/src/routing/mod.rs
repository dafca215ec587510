//! Notification routing: categories, the destination table, and the router.

mod category;
mod router;

pub use category::*;
pub use router::*;
