use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use valise_core::{
    Arg, BoundFunction, DirectiveMap, DirectiveValue, Engine, Error, FunctionRegistry, Result,
    Schema,
};

/// Directive whose string value may encode a named-function call.
pub const DEFAULT_DIRECTIVE: &str = "default";

static DEFAULT_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)\(([A-Za-z0-9_.]+)\)$").expect("default call regex")
});

/// Policy for directives with no matching builder method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Skip the directive. The duck-typed engine boundary is
    /// forward-compatible: a directive the engine does not understand is
    /// not an error.
    #[default]
    Lenient,
    /// Reject the directive with an unknown-directive error.
    Strict,
}

/// Apply a flat directive map to a fresh builder of the named type.
///
/// Instantiates the base builder through the engine factory, then folds
/// the directives over it in insertion order. Every applied call rebinds
/// the working builder to the call's return value; builders may be
/// immutable and hand back a new instance each time.
pub fn build_schema_for(
    kind: &str,
    directives: DirectiveMap,
    engine: &dyn Engine,
    functions: &dyn FunctionRegistry,
    strictness: Strictness,
) -> Result<Schema> {
    let mut schema = engine
        .builder(kind)
        .ok_or_else(|| Error::UnknownType(kind.to_string()))?;

    debug!(%kind, directives = directives.len(), "building schema");

    for (name, value) in directives {
        let value = if name == DEFAULT_DIRECTIVE {
            rewrite_default(value, functions)?
        } else {
            value
        };

        if !schema.has_method(&name) {
            match strictness {
                Strictness::Lenient => {
                    debug!(directive = %name, "no matching builder method, skipping");
                    continue;
                }
                Strictness::Strict => return Err(Error::UnknownDirective(name)),
            }
        }

        schema = match value {
            DirectiveValue::Flag => schema.call(&name, Vec::new())?,
            DirectiveValue::Value(arg) => schema.call(&name, vec![arg])?,
            DirectiveValue::Args(args) => schema.call(&name, args)?,
        };
    }

    Ok(schema)
}

/// Rewrite a `default` value written in call-notation, `name(arg.path)`,
/// into the ordered pair `[bound function, name]`. Values that do not
/// match the pattern pass through untouched.
fn rewrite_default(
    value: DirectiveValue,
    functions: &dyn FunctionRegistry,
) -> Result<DirectiveValue> {
    let DirectiveValue::Value(Arg::Str(notation)) = &value else {
        return Ok(value);
    };
    let Some(captures) = DEFAULT_CALL_RE.captures(notation) else {
        return Ok(value);
    };

    let name = &captures[1];
    let arg_path = &captures[2];
    let func = functions
        .resolve(name)
        .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;

    Ok(DirectiveValue::Args(vec![
        Arg::Function(BoundFunction::new(name, arg_path, func)),
        Arg::Str(name.to_string()),
    ]))
}
