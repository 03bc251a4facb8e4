#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Durable record store backed by sea-orm.
//!
//! Four independent tables, no cross-table transactions. Writes are
//! insert-or-replace and reads are equality filters only.

mod repos;
mod store;

pub use store::{Store, redact_url};
