//! # subtrack-domain
//!
//! Pure domain model for the subtrack subscription service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **`YearMonth`** value type (parse, format, storage mapping)
//! - Define **Subscriptions** and their partial-update rules
//! - Define the **price total** filter used by aggregation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;
pub mod year_month;

pub mod subscription;
pub mod total;
