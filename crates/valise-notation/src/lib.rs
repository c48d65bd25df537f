//! Notation-to-schema compiler.
//!
//! Compiles a compact shorthand notation for data-validation rules into
//! calls against a fluent schema-builder engine. The engine itself is an
//! external capability; this crate only decides which factory and which
//! chainable methods to invoke, in which order, with which arguments.

pub mod apply;
pub mod parser;
pub mod shorthand;

pub use apply::{Strictness, build_schema_for};
pub use parser::{Parser, ParserBuilder};
pub use shorthand::Shorthand;
