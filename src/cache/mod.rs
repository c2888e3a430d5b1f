//! Cache Module
//!
//! In-process read cache for the catalog: the key-value store, the typed key
//! builders shared by read and write paths, and the write-driven invalidator.

mod entry;
pub mod invalidator;
pub mod keys;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use invalidator::{CacheInvalidator, ChangeDescriptor};
pub use keys::CacheKey;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL in seconds for search, related-products and review-listing keys.
/// Primary entity and listing keys carry no TTL.
pub const DERIVED_LISTING_TTL_SECS: u64 = 3600;
