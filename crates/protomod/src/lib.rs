//! protomod — schema compiler.
//!
//! Parses protobuf-style schema definition files, composes their import
//! graphs (each file inlined exactly once, depth-first in declaration
//! order), validates a requested output namespace against the composed
//! tree, and projects the result as one of four artifacts: a structural
//! JSON document, or that document embedded in JavaScript glue for one of
//! three module conventions (variable-assignment shim, CommonJS export,
//! AMD definition).
//!
//! # Pipeline
//!
//! ```text
//! lexer -> parser -> resolve::compose -> resolve::namespace -> emit
//! ```
//!
//! [`compile`] runs the whole pipeline in one call:
//!
//! ```no_run
//! use protomod::emit::RenderOptions;
//! use std::path::Path;
//!
//! let text = protomod::compile(
//!     Path::new("schema.proto"),
//!     &[],
//!     &RenderOptions::default(),
//! )?;
//! # Ok::<(), protomod::Error>(())
//! ```

pub mod ast;
pub mod compile;
pub mod emit;
pub mod error;
pub mod foundation;
pub mod lexer;
pub mod parser;
pub mod resolve;

pub use compile::compile;
pub use error::{Error, Result};
