//! Storage for mirrored resources.
//!
//! Everything is kept as plain files under a destination root that mirrors
//! the remote `year_YYYY/month_MM/day_DD/gid_*` tree.

pub mod local;

// Re-export for convenience
pub use local::LocalMirror;
