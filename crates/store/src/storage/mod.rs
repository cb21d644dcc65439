//! Storage abstractions for the document store.
//!
//! Holds the file-backed state cell that owns the on-disk JSON
//! representation; the collection layer adds CRUD semantics on top.

pub mod json_file;
