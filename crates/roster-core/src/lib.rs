//! Core types, privacy rules, and storage traits for the Roster student
//! directory.
//!
//! This crate is free of HTTP and database dependencies. The privacy
//! subsystem lives in three pure pieces plus one store-driven one:
//!
//! - [`resolve`] decides per-field visibility for a viewer,
//! - [`filter`] applies those decisions to a student record,
//! - [`search`] matches text only against fields the viewer may see,
//! - [`defaults`] lazily creates a student's initial settings.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod defaults;
pub mod error;
pub mod field;
pub mod filter;
pub mod identity;
pub mod reference;
pub mod resolve;
pub mod search;
pub mod setting;
pub mod store;
pub mod student;

pub use error::{Error, Result};
