//! # subtrack-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SubscriptionRepository` — CRUD and price aggregation for subscriptions
//! - Define **driving/inbound ports** as use-case structs:
//!   - `SubscriptionService` — create, get, list, update, delete, total
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `subtrack-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
