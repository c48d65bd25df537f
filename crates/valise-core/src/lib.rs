//! Core contracts for Valise.
//!
//! This crate defines the capability traits consumed by the notation
//! compiler (engine, builder, function registry) together with the
//! directive data model and the shared error type.

pub mod directive;
pub mod engine;
pub mod error;
pub mod functions;

pub use directive::{Arg, DirectiveMap, DirectiveValue};
pub use engine::{Builder, Engine, Schema};
pub use error::{Error, Result};
pub use functions::{BoundFunction, FunctionRegistry, InMemoryFunctions, RegistryFn};
