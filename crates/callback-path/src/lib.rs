//! Path-addressed callback injection for RPC argument trees.
//!
//! An RPC-style message may embed "remote callback" placeholders at
//! arbitrary depth inside its argument structure, without the payload's
//! static shape being known in advance. After the wire layer has decoded
//! the arguments into a [`Node`] tree and extracted one ([`Path`],
//! [`Handler`]) pair per placeholder, this crate locates each path's
//! target position and overwrites it in place with the handler.
//!
//! The crate neither frames, encodes nor decodes messages, and it does not
//! decide which positions are callbacks; it only performs the in-place
//! injection step between decoding and dispatch.
//!
//! # Example
//!
//! ```
//! use callback_path::{CallbackSpec, Handler, Node, PathStep};
//!
//! // Decoded arguments: ["hello", <callback placeholder>]
//! let mut args = Node::Seq(vec![
//!     Node::Scalar(serde_json::json!("hello")),
//!     Node::empty_slot(),
//! ]);
//!
//! let handler = Handler::new(|_args| {});
//! let spec = CallbackSpec::new(vec![PathStep::Index(1)], handler.clone());
//! spec.apply(&mut args).unwrap();
//!
//! assert_eq!(
//!     args,
//!     Node::Seq(vec![
//!         Node::Scalar(serde_json::json!("hello")),
//!         Node::slot(Node::Callback(handler)),
//!     ])
//! );
//! ```
//!
//! # Concurrency
//!
//! Application is synchronous and single-writer: the caller owns the tree
//! exclusively for the duration of a batch of
//! [`apply`](CallbackSpec::apply) calls and applies units sequentially. A
//! deferred [`Record`]'s population and drain carry the same contract
//! forward; its owner must not populate and drain it concurrently.

use thiserror::Error;

pub mod apply;
pub mod node;
pub mod path;

pub use apply::CallbackSpec;
pub use node::{field_name, Handler, Node, Record};
pub use path::{path_from_values, Path, PathStep};

/// Errors produced by [`CallbackSpec::apply`].
///
/// Every kind is local to one apply call; the caller decides whether to
/// abort the whole batch or skip the unit and continue. A vanished target
/// is not an error: applying against a missing key, an out-of-range index
/// or an empty slot succeeds without mutating the tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    /// The path ran out of steps while a container still expected one more
    /// hop to pick an element.
    #[error("callback path too short: {0:?}")]
    PathTooShort(Path),
    /// A step's type does not match what the current node kind requires:
    /// a non-integer index on a sequence, or a non-name step on a record.
    #[error("expected {expected} in callback path, got {step:?}")]
    StepType {
        expected: &'static str,
        step: PathStep,
    },
    /// The tree reached a node kind this algorithm has no addressing rule
    /// for, such as a primitive where a container was expected.
    #[error("unhandled value of kind '{0}' in callback path")]
    UnhandledKind(&'static str),
    /// The step is neither index-like nor name-like. The decode layer is
    /// supposed to guarantee well-formed paths, so unlike the other kinds
    /// this indicates a contract breach rather than a data-shape mismatch.
    #[error("malformed step in callback path: {0:?}")]
    MalformedStep(PathStep),
}
