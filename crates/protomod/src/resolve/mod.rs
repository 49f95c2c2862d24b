//! Import resolution and namespace validation.
//!
//! - `locate`: include-path-aware import resolution with stable failure
//!   reporting
//! - `compose`: depth-first import composition with per-load dedup
//! - `namespace`: validation of a requested output namespace against the
//!   composed schema

pub mod compose;
pub mod locate;
pub mod namespace;

pub use compose::{ImportCacheSet, SchemaLoader};
pub use locate::resolve_import;
pub use namespace::is_valid_in;
