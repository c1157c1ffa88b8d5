//! Path application: walking an argument tree and installing handlers.

use log::trace;

use crate::node::{Handler, Node};
use crate::path::{Path, PathStep};
use crate::ApplyError;

/// A pending callback injection: the path at which the decode layer found a
/// remote-callback placeholder, and the handler to install there.
///
/// One spec is consumed exactly once, by a single [`apply`](CallbackSpec::apply)
/// call; the outcome is a terminal assignment, a silent skip, a deferral
/// onto a record's queue, or an error. Specs are never retried internally.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackSpec {
    pub path: Path,
    pub handler: Handler,
}

impl CallbackSpec {
    pub fn new(path: Path, handler: Handler) -> CallbackSpec {
        CallbackSpec { path, handler }
    }

    /// Walk `root` along this spec's path and install the handler in place.
    ///
    /// Steps are consumed left to right while the cursor descends through
    /// sequences, mappings, indirections, open slots and records. The walk
    /// ends with a terminal assignment when the path is exhausted at an
    /// open slot, when the last step lands on a mapping, or as soon as an
    /// invokable position is reached (functions are leaves, even if steps
    /// remain). A deferred record queues the remaining path instead of
    /// descending. A vanished target — missing key, empty slot, index past
    /// the end — is not an error: the call succeeds without mutating the
    /// tree.
    ///
    /// # Example
    ///
    /// ```
    /// use callback_path::{CallbackSpec, Handler, Node, PathStep};
    ///
    /// let mut args = Node::Seq(vec![Node::empty_slot()]);
    /// let handler = Handler::new(|_| {});
    ///
    /// CallbackSpec::new(vec![PathStep::Index(0)], handler.clone())
    ///     .apply(&mut args)
    ///     .unwrap();
    ///
    /// assert_eq!(args, Node::Seq(vec![Node::slot(Node::Callback(handler))]));
    /// ```
    pub fn apply(&self, root: &mut Node) -> Result<(), ApplyError> {
        trace!("apply: path {:?} against {} root", self.path, root.kind());
        let mut value = root;
        let mut i = 0;
        loop {
            match value {
                Node::Seq(items) => {
                    if i == self.path.len() {
                        return Err(ApplyError::PathTooShort(self.path.clone()));
                    }
                    let index = seq_index(&self.path[i])?;
                    i += 1;
                    match items.get_mut(index) {
                        Some(item) => value = item,
                        // The element is gone from this message shape.
                        None => return Ok(()),
                    }
                }
                Node::Map(entries) => {
                    if i == self.path.len() {
                        return Err(ApplyError::PathTooShort(self.path.clone()));
                    }
                    let key = map_key(&self.path[i])?;
                    if i == self.path.len() - 1 {
                        // Mappings cannot be addressed through the way
                        // record fields can: the last hop writes the whole
                        // value under the key, creating it if absent.
                        entries.insert(key, Node::Callback(self.handler.clone()));
                        return Ok(());
                    }
                    i += 1;
                    match entries.get_mut(&key) {
                        Some(entry) => value = entry,
                        None => return Ok(()),
                    }
                }
                Node::Indirect(inner) => value = &mut **inner,
                Node::Slot(held) => {
                    if i == self.path.len() {
                        *held = Some(Box::new(Node::Callback(self.handler.clone())));
                        return Ok(());
                    }
                    match held {
                        Some(inner) => value = &mut **inner,
                        None => return Ok(()),
                    }
                }
                Node::Record(record) => {
                    if record.is_deferred() {
                        record.queue(CallbackSpec::new(
                            self.path[i..].to_vec(),
                            self.handler.clone(),
                        ));
                        return Ok(());
                    }
                    if i == self.path.len() {
                        return Err(ApplyError::PathTooShort(self.path.clone()));
                    }
                    let name = match &self.path[i] {
                        PathStep::Key(name) => name,
                        step => {
                            return Err(ApplyError::StepType {
                                expected: "a field name",
                                step: step.clone(),
                            })
                        }
                    };
                    i += 1;
                    match record.field_mut(name) {
                        Some(field) => value = field,
                        None => return Ok(()),
                    }
                }
                Node::Callback(held) => {
                    // Functions are leaves: install here even if steps
                    // remain unconsumed.
                    *held = self.handler.clone();
                    return Ok(());
                }
                Node::Absent => return Ok(()),
                Node::Scalar(_) => return Err(ApplyError::UnhandledKind(value.kind())),
            }
        }
    }
}

fn seq_index(step: &PathStep) -> Result<usize, ApplyError> {
    match step {
        // An index past usize::MAX is out of range of any sequence.
        PathStep::Index(index) => Ok(usize::try_from(*index).unwrap_or(usize::MAX)),
        PathStep::Key(key) => key.parse().map_err(|_| ApplyError::StepType {
            expected: "an integer index",
            step: step.clone(),
        }),
        PathStep::Invalid(_) => Err(ApplyError::MalformedStep(step.clone())),
    }
}

fn map_key(step: &PathStep) -> Result<String, ApplyError> {
    match step {
        PathStep::Index(index) => Ok(index.to_string()),
        PathStep::Key(key) => Ok(key.clone()),
        PathStep::Invalid(_) => Err(ApplyError::MalformedStep(step.clone())),
    }
}
