use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Callable stored in a function registry.
///
/// The leading parameter is the argument path captured from the notation;
/// any later parameters are supplied at invocation time by the engine.
pub type RegistryFn = Arc<dyn Fn(&str, &[Value]) -> Value + Send + Sync>;

/// External lookup from function name to callable, used to resolve
/// `default` directives written in call-notation.
pub trait FunctionRegistry {
    fn resolve(&self, name: &str) -> Option<RegistryFn>;
}

/// A registry callable partially applied with its argument path.
#[derive(Clone)]
pub struct BoundFunction {
    name: String,
    arg_path: String,
    func: RegistryFn,
}

impl BoundFunction {
    pub fn new(name: impl Into<String>, arg_path: impl Into<String>, func: RegistryFn) -> Self {
        Self {
            name: name.into(),
            arg_path: arg_path.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg_path(&self) -> &str {
        &self.arg_path
    }

    /// Invoke the underlying callable with the bound path and any
    /// engine-supplied parameters.
    pub fn invoke(&self, params: &[Value]) -> Value {
        (self.func)(&self.arg_path, params)
    }
}

impl fmt::Debug for BoundFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundFunction")
            .field("name", &self.name)
            .field("arg_path", &self.arg_path)
            .finish_non_exhaustive()
    }
}

/// HashMap-backed function registry.
#[derive(Default, Clone)]
pub struct InMemoryFunctions {
    entries: HashMap<String, RegistryFn>,
}

impl InMemoryFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&str, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(func));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl FunctionRegistry for InMemoryFunctions {
    fn resolve(&self, name: &str) -> Option<RegistryFn> {
        self.entries.get(name).cloned()
    }
}
