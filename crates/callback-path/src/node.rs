//! The decoded argument tree and the values that live in it.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::apply::CallbackSpec;

/// The callable installed at a callback position.
///
/// Takes an arbitrary argument list and returns nothing; invocation is
/// fire-and-forget. Cloning is cheap (reference-counted) and equality is
/// identity: a clone compares equal to its original, two handlers built
/// from the same closure do not.
///
/// The tree and its handlers are single-writer by contract, so this is
/// `Rc`-based and not `Send`.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&[Node])>);

impl Handler {
    pub fn new(f: impl Fn(&[Node]) + 'static) -> Handler {
        Handler(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, args: &[Node]) {
        (self.0)(args)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0))
    }
}

/// One node of a decoded argument tree.
///
/// The decode layer lowers a wire message into this closed set of kinds;
/// path application dispatches on the tag. [`Scalar`](Node::Scalar) leaves
/// carry decoded primitives and are never valid intermediate nodes on a
/// path.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered sequence of values.
    Seq(Vec<Node>),
    /// Open key-value mapping; every value slot is dynamically typed.
    Map(IndexMap<String, Node>),
    /// One level of indirection.
    Indirect(Box<Node>),
    /// An open slot that can hold any concrete value, or nothing (a
    /// decoded null).
    Slot(Option<Box<Node>>),
    /// A fixed-shape record with named fields.
    Record(Record),
    /// An invokable position.
    Callback(Handler),
    /// A vanished target.
    Absent,
    /// A primitive leaf.
    Scalar(Value),
}

impl Node {
    /// Human-readable kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Seq(_) => "sequence",
            Node::Map(_) => "mapping",
            Node::Indirect(_) => "indirection",
            Node::Slot(_) => "slot",
            Node::Record(_) => "record",
            Node::Callback(_) => "callback",
            Node::Absent => "absent",
            Node::Scalar(_) => "scalar",
        }
    }

    /// An open slot holding `value`.
    pub fn slot(value: Node) -> Node {
        Node::Slot(Some(Box::new(value)))
    }

    /// An open slot holding nothing.
    pub fn empty_slot() -> Node {
        Node::Slot(None)
    }
}

/// Normalize a wire field name to the record naming convention.
///
/// Wire messages carry lowerCamelCase names; records store their fields in
/// exported form, with the first character upper-cased and the rest
/// untouched. Idempotent, so already-normalized names pass through.
///
/// # Example
///
/// ```
/// use callback_path::field_name;
///
/// assert_eq!(field_name("name"), "Name");
/// assert_eq!(field_name("Name"), "Name");
/// assert_eq!(field_name("onMessage"), "OnMessage");
/// ```
pub fn field_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A fixed-shape record with named fields.
///
/// Field keys are stored in the convention produced by [`field_name`];
/// construction and path lookup both normalize through it, so `"name"` and
/// `"Name"` address the same field.
///
/// A record built with [`Record::deferred`] cannot resolve sub-paths yet:
/// its real field values arrive later in the decode pipeline. Path
/// application reaching such a record queues the remaining (path, handler)
/// pair instead of descending. Once the record is populated its owner calls
/// [`Record::drain_pending`] and re-applies each unit against the final
/// field values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: IndexMap<String, Node>,
    pending: Option<Vec<CallbackSpec>>,
}

impl Record {
    /// An empty record that resolves paths in place.
    pub fn new() -> Record {
        Record {
            fields: IndexMap::new(),
            pending: None,
        }
    }

    /// A record that accepts deferred resolution units instead of
    /// resolving sub-paths in place.
    pub fn deferred() -> Record {
        Record {
            fields: IndexMap::new(),
            pending: Some(Vec::new()),
        }
    }

    /// Build a record from `(wire name, value)` pairs.
    pub fn with_fields<'a, I>(fields: I) -> Record
    where
        I: IntoIterator<Item = (&'a str, Node)>,
    {
        let mut record = Record::new();
        for (name, value) in fields {
            record.set_field(name, value);
        }
        record
    }

    /// Whether this record queues resolution units instead of resolving
    /// them in place.
    pub fn is_deferred(&self) -> bool {
        self.pending.is_some()
    }

    /// Set a field, normalizing `name` through [`field_name`].
    pub fn set_field(&mut self, name: &str, value: Node) {
        self.fields.insert(field_name(name), value);
    }

    pub fn field(&self, name: &str) -> Option<&Node> {
        self.fields.get(field_name(name).as_str())
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.fields.get_mut(field_name(name).as_str())
    }

    /// The queued resolution units awaiting [`Record::drain_pending`].
    pub fn pending(&self) -> &[CallbackSpec] {
        self.pending.as_deref().unwrap_or(&[])
    }

    // Only reached when is_deferred() holds; a non-deferred record never
    // accumulates units.
    pub(crate) fn queue(&mut self, spec: CallbackSpec) {
        if let Some(pending) = &mut self.pending {
            pending.push(spec);
        }
    }

    /// Take every queued resolution unit, in insertion order.
    ///
    /// Called by the record's owner once the real field values exist; the
    /// owner re-applies each unit against those values. The record stays
    /// deferred, so later applications queue again.
    pub fn drain_pending(&mut self) -> Vec<CallbackSpec> {
        match &mut self.pending {
            Some(pending) => std::mem::take(pending),
            None => Vec::new(),
        }
    }
}
