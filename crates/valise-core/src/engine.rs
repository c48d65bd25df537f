use std::any::Any;
use std::fmt;

use crate::directive::Arg;
use crate::error::Result;

/// Schema value produced by an engine.
///
/// Opaque to the compiler: it is whatever the engine decides a schema is.
/// Callers that need the engine's concrete value downcast through
/// [`Builder::into_any`].
pub type Schema = Box<dyn Builder>;

/// Capability object exposing zero-argument factory methods named after
/// primitive types.
///
/// The compiler does not fix the set of type names; it recognizes whichever
/// names the engine resolves. `None` means the type is unknown to the
/// engine.
pub trait Engine {
    fn builder(&self, kind: &str) -> Option<Schema>;
}

/// Chainable schema-construction object returned by an [`Engine`] and by
/// its own methods.
///
/// The surface is duck-typed: any method whose name matches a directive is
/// assumed chainable. `call` consumes the current state and returns the
/// next one, so engines are free to hand back a new instance on every
/// invocation.
pub trait Builder {
    /// Whether a chainable method with this name exists on the current
    /// builder. Checked before every invocation; a missing method is the
    /// caller's signal to skip or reject the directive.
    fn has_method(&self, name: &str) -> bool;

    /// Invoke the named method with the given positional arguments and
    /// return the resulting builder state.
    fn call(self: Box<Self>, name: &str, args: Vec<Arg>) -> Result<Schema>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl fmt::Debug for dyn Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<schema>")
    }
}
