use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use valise_core::{
    Arg, DirectiveMap, DirectiveValue, Engine, Error, FunctionRegistry, InMemoryFunctions, Result,
    Schema,
};

use crate::apply::{Strictness, build_schema_for};
use crate::shorthand;

/// Reserved field selecting the engine factory in typed object configs.
pub const TYPE_FIELD: &str = "type";
/// Prefix marking a directive on the enclosing object schema.
pub const DIRECTIVE_PREFIX: char = '@';
/// Directive keys whose array values are ordered sequences of sub-configs.
pub const COMPOSITE_DIRECTIVES: &[&str] = &["try", "items"];

const OBJECT_TYPE: &str = "object";
const ALTERNATIVES_TYPE: &str = "alternatives";
const KEYS_DIRECTIVE: &str = "keys";
const TRY_DIRECTIVE: &str = "try";

/// Notation compiler over an injected engine capability.
///
/// Each `parse` call is independent: the parser holds no state beyond the
/// engine and function registry references, and never mutates either.
pub struct Parser {
    engine: Arc<dyn Engine>,
    functions: Arc<dyn FunctionRegistry>,
    strictness: Strictness,
}

/// Builder for [`Parser`]; fails at `build` time when no engine capability
/// was supplied.
#[derive(Default)]
pub struct ParserBuilder {
    engine: Option<Arc<dyn Engine>>,
    functions: Option<Arc<dyn FunctionRegistry>>,
    strictness: Strictness,
}

impl ParserBuilder {
    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn functions(mut self, functions: Arc<dyn FunctionRegistry>) -> Self {
        self.functions = Some(functions);
        self
    }

    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn build(self) -> Result<Parser> {
        let engine = self.engine.ok_or(Error::MissingEngine)?;
        Ok(Parser {
            engine,
            functions: self
                .functions
                .unwrap_or_else(|| Arc::new(InMemoryFunctions::new())),
            strictness: self.strictness,
        })
    }
}

impl Parser {
    /// Parser over the given engine with an empty function registry and
    /// lenient directive handling.
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            functions: Arc::new(InMemoryFunctions::new()),
            strictness: Strictness::default(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    /// Turn one configuration value into one engine-produced schema.
    ///
    /// Accepts a shorthand string, an ordered sequence (implicitly
    /// `alternatives`), an object with a `type` field, or an object
    /// without one (implicitly `object` with nested sub-schemas).
    /// Composites are parsed depth-first: children are built before the
    /// parent needs them as arguments.
    pub fn parse(&self, config: &Value) -> Result<Schema> {
        match config {
            Value::String(notation) => {
                debug!(%notation, "parsing shorthand config");
                let parsed = shorthand::parse(notation);
                self.build(&parsed.kind, parsed.directives)
            }
            Value::Array(items) => self.parse_sequence(items),
            Value::Object(fields) => {
                if fields.contains_key(TYPE_FIELD) {
                    self.parse_typed(fields)
                } else {
                    self.parse_untyped(fields)
                }
            }
            other => Err(Error::InvalidConfig(format!(
                "unsupported config value: {}",
                value_kind(other)
            ))),
        }
    }

    /// Parse each top-level field of an object config independently,
    /// returning the schemas under their original field names in order.
    pub fn parse_fields(&self, config: &Value) -> Result<Vec<(String, Schema)>> {
        let Value::Object(fields) = config else {
            return Err(Error::InvalidConfig(
                "top-level config must be an object".to_string(),
            ));
        };

        let mut schemas = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            schemas.push((name.clone(), self.parse(value)?));
        }
        Ok(schemas)
    }

    /// Convenience entry point: parse each top-level field against the
    /// given engine without constructing a parser by hand.
    pub fn build_schema(config: &Value, engine: Arc<dyn Engine>) -> Result<Vec<(String, Schema)>> {
        Parser::new(engine).parse_fields(config)
    }

    /// A bare ordered sequence is an `alternatives` schema; element order
    /// defines match precedence downstream.
    fn parse_sequence(&self, items: &[Value]) -> Result<Schema> {
        let mut schemas = Vec::with_capacity(items.len());
        for item in items {
            schemas.push(Arg::Schema(self.parse(item)?));
        }

        let mut directives = DirectiveMap::new();
        directives.insert(TRY_DIRECTIVE, DirectiveValue::Args(schemas));
        self.build(ALTERNATIVES_TYPE, directives)
    }

    fn parse_typed(&self, fields: &Map<String, Value>) -> Result<Schema> {
        let kind = fields
            .get(TYPE_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::InvalidConfig(format!("the {TYPE_FIELD} field must be a string"))
            })?;

        let mut directives = DirectiveMap::new();
        for (name, value) in fields {
            if name == TYPE_FIELD {
                continue;
            }
            if COMPOSITE_DIRECTIVES.contains(&name.as_str())
                && let Value::Array(items) = value
            {
                let mut schemas = Vec::with_capacity(items.len());
                for item in items {
                    schemas.push(Arg::Schema(self.parse(item)?));
                }
                directives.insert(name, DirectiveValue::Args(schemas));
            } else {
                directives.insert(name, directive_from_json(name, value)?);
            }
        }

        self.build(kind, directives)
    }

    /// An object config without a `type` field: every plain field is a
    /// nested sub-schema collected into `keys`, and `@`-prefixed fields
    /// are directives on the object schema itself.
    fn parse_untyped(&self, fields: &Map<String, Value>) -> Result<Schema> {
        let mut children: Vec<(String, Schema)> = Vec::new();
        let mut own: Vec<(String, DirectiveValue)> = Vec::new();

        for (name, value) in fields {
            match name.strip_prefix(DIRECTIVE_PREFIX) {
                Some(directive) => {
                    own.push((directive.to_string(), directive_from_json(directive, value)?));
                }
                None => children.push((name.clone(), self.parse(value)?)),
            }
        }

        // keys carries the children first; the object's own directives
        // follow in source order.
        let mut directives = DirectiveMap::new();
        directives.insert(KEYS_DIRECTIVE, DirectiveValue::Value(Arg::Map(children)));
        for (name, value) in own {
            directives.insert(name, value);
        }

        self.build(OBJECT_TYPE, directives)
    }

    fn build(&self, kind: &str, directives: DirectiveMap) -> Result<Schema> {
        build_schema_for(
            kind,
            directives,
            self.engine.as_ref(),
            self.functions.as_ref(),
            self.strictness,
        )
    }
}

/// Convert a structured-config directive value into its call form: null
/// means argument-less, an array spreads its elements, anything else is a
/// single argument.
fn directive_from_json(name: &str, value: &Value) -> Result<DirectiveValue> {
    match value {
        Value::Null => Ok(DirectiveValue::Flag),
        Value::Array(items) => {
            let mut args = Vec::with_capacity(items.len());
            for item in items {
                args.push(scalar_arg(name, item)?);
            }
            Ok(DirectiveValue::Args(args))
        }
        other => Ok(DirectiveValue::Value(scalar_arg(name, other)?)),
    }
}

fn scalar_arg(name: &str, value: &Value) -> Result<Arg> {
    match value {
        Value::Bool(flag) => Ok(Arg::Bool(*flag)),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(Arg::Int(int))
            } else if let Some(float) = number.as_f64() {
                Ok(Arg::Float(float))
            } else {
                Err(Error::InvalidConfig(format!(
                    "directive '{name}' has an unrepresentable number"
                )))
            }
        }
        Value::String(text) => Ok(Arg::Str(text.clone())),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(Error::InvalidConfig(format!(
            "directive '{name}' expects a primitive value"
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
