//! File-backed document store for the maintenance API.
//! - Owns the on-disk JSON database and its load/save cycle.
//! - Exposes CRUD over the two fixed collections (`users`, `records`).
//! - Serializes every mutation behind one lock so concurrent handlers
//!   cannot lose each other's writes.

pub mod api;
pub mod errors;
pub mod file;
pub mod model;
pub mod storage;
