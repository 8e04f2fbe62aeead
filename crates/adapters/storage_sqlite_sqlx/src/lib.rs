//! # subtrack-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port trait defined in `subtrack-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Ensure the `subscriptions` table exists (sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `subtrack-app` (for port traits) and `subtrack-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod subscription_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use subscription_repo::SqliteSubscriptionRepository;
