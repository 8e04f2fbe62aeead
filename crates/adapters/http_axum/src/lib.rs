//! # subtrack-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the subscription **JSON API**
//!   (`/createSubscription`, `/subscriptions`, `/subscriptions/{id}`,
//!   `/subscriptions/total`)
//! - Validate and translate request shapes (UUIDs, `MM-YYYY` / `YYYY-MM`
//!   months, partial updates) into application service calls
//! - Map application results and typed errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `subtrack-app` (for port traits and services) and `subtrack-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
