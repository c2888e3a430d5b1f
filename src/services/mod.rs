//! Services Module
//!
//! Read-path and write-path orchestration on top of the cache and the
//! repository, plus the rating aggregator.

pub mod query;
pub mod ratings;
pub mod write;

pub use query::QueryService;
pub use ratings::{recompute, RatingSummary};
pub use write::WriteService;
