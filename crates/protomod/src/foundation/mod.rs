//! Compiler foundation types
//!
//! Shared building blocks used throughout the compiler: validated dotted
//! names and source location tracking.

pub mod name;
pub mod span;

pub use name::DottedName;
pub use span::{SourceFile, SourceMap, Span};
