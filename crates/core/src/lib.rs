//! Shared domain types for the Snapbooth backend.
//!
//! Holds the error taxonomy, job/notification records, booth settings
//! (including the output-resolution table), Drive link resolution, and
//! the branding-overlay image compositor. Everything here is consumed
//! by the `ark`, `drive`, `pipeline`, and `api` crates.

pub mod compositor;
pub mod concept;
pub mod error;
pub mod links;
pub mod settings;
pub mod types;
