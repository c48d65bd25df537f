use thiserror::Error;

/// Error type shared across Valise crates.
#[derive(Debug, Error)]
pub enum Error {
    /// No engine capability was supplied to the parser.
    #[error("missing engine")]
    MissingEngine,
    /// The resolved type name has no factory on the engine.
    #[error("unknown type: {0}")]
    UnknownType(String),
    /// A default-call directive named a function absent from the registry.
    #[error("unable to locate function with name: {0}")]
    UnknownFunction(String),
    /// Strict mode only: a directive has no matching builder method.
    #[error("unknown directive: {0}")]
    UnknownDirective(String),
    /// The configuration value has an unsupported shape.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Failure surfaced by an engine builder call.
    #[error("engine error: {0}")]
    Engine(String),
}

/// Convenience alias for results returned by Valise crates.
pub type Result<T> = std::result::Result<T, Error>;
