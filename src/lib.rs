//! Catalog API - e-commerce catalog with an in-process read cache
//!
//! CRUD over products, categories and reviews, with a read-through cache and
//! write-driven invalidation keeping cached listings consistent with the
//! repository.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repo;
pub mod services;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
