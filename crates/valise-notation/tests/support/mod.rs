//! Recording engine for call-sequence assertions.
//!
//! Every factory and builder-method invocation appends a rendered entry to
//! a shared log. Builders carry `kind#n` labels recoverable through
//! `as_any`, so tests can also assert which schema value came back.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use valise_core::{Arg, Builder, Engine, Error, Result, Schema};

/// Shared, clonable view of the recorded call sequence.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl CallLog {
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn push(&self, entry: String) {
        self.entries.borrow_mut().push(entry);
    }
}

pub struct RecordingEngine {
    kinds: Vec<(String, Vec<String>)>,
    fail_method: Option<String>,
    log: CallLog,
    counter: Rc<Cell<usize>>,
}

impl RecordingEngine {
    /// Engine exposing the given type names, whose builders answer to the
    /// listed method names.
    pub fn new(kinds: &[(&str, &[&str])]) -> Self {
        Self {
            kinds: kinds
                .iter()
                .map(|(kind, methods)| {
                    (
                        kind.to_string(),
                        methods.iter().map(|method| method.to_string()).collect(),
                    )
                })
                .collect(),
            fail_method: None,
            log: CallLog::default(),
            counter: Rc::new(Cell::new(0)),
        }
    }

    /// Make every builder reject calls to the named method.
    pub fn fail_method(mut self, name: &str) -> Self {
        self.fail_method = Some(name.to_string());
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl Engine for RecordingEngine {
    fn builder(&self, kind: &str) -> Option<Schema> {
        let (_, methods) = self.kinds.iter().find(|(name, _)| name == kind)?;
        let id = self.counter.get();
        self.counter.set(id + 1);
        self.log.push(format!("{kind}()"));
        Some(Box::new(RecordingBuilder {
            label: format!("{kind}#{id}"),
            methods: methods.clone(),
            fail_method: self.fail_method.clone(),
            log: self.log.clone(),
        }))
    }
}

pub struct RecordingBuilder {
    label: String,
    methods: Vec<String>,
    fail_method: Option<String>,
    log: CallLog,
}

impl Builder for RecordingBuilder {
    fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|method| method == name)
    }

    fn call(self: Box<Self>, name: &str, args: Vec<Arg>) -> Result<Schema> {
        if self.fail_method.as_deref() == Some(name) {
            return Err(Error::Engine(format!("{name} rejected")));
        }
        let rendered: Vec<String> = args.iter().map(render_arg).collect();
        self.log
            .push(format!("{}.{}({})", self.label, name, rendered.join(", ")));
        Ok(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Label of a schema produced by the recording engine.
pub fn schema_label(schema: &Schema) -> String {
    schema
        .as_any()
        .downcast_ref::<RecordingBuilder>()
        .map(|builder| builder.label.clone())
        .unwrap_or_else(|| "<foreign schema>".to_string())
}

fn render_arg(arg: &Arg) -> String {
    match arg {
        Arg::Bool(value) => value.to_string(),
        Arg::Int(value) => value.to_string(),
        Arg::Float(value) => value.to_string(),
        Arg::Str(value) => format!("\"{value}\""),
        Arg::Function(bound) => format!("<fn {}({})>", bound.name(), bound.arg_path()),
        Arg::Schema(schema) => schema_label(schema),
        Arg::Map(entries) => {
            let rendered: Vec<String> = entries
                .iter()
                .map(|(name, schema)| format!("{name}: {}", schema_label(schema)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}
