//! Callback path types.

use serde_json::Value;

/// A single addressing step in a callback path.
///
/// Wire payloads address callback positions with a mixture of integers and
/// strings, so both are first-class. A numeric [`Key`](PathStep::Key) is
/// accepted wherever an integer index is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// A non-negative sequence index.
    Index(u64),
    /// A mapping key or record field name.
    Key(String),
    /// A decoded wire value that is neither an index nor a name.
    ///
    /// The decode layer is expected to never produce these; the applier
    /// reports one as
    /// [`ApplyError::MalformedStep`](crate::ApplyError::MalformedStep).
    Invalid(Value),
}

/// A callback's path in the arguments structure.
///
/// Ordered and immutable once constructed. No validation happens at
/// construction time; validity is checked lazily while the path is applied.
pub type Path = Vec<PathStep>;

impl PathStep {
    /// Classify a decoded wire value as a path step.
    ///
    /// Non-negative integers become [`Index`](PathStep::Index), strings
    /// become [`Key`](PathStep::Key), everything else is kept as
    /// [`Invalid`](PathStep::Invalid) for the applier to reject.
    ///
    /// # Example
    ///
    /// ```
    /// use callback_path::PathStep;
    /// use serde_json::json;
    ///
    /// assert_eq!(PathStep::from_value(&json!(2)), PathStep::Index(2));
    /// assert_eq!(PathStep::from_value(&json!("on")), PathStep::Key("on".to_string()));
    /// assert_eq!(PathStep::from_value(&json!(true)), PathStep::Invalid(json!(true)));
    /// ```
    pub fn from_value(value: &Value) -> PathStep {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(index) => PathStep::Index(index),
                None => PathStep::Invalid(value.clone()),
            },
            Value::String(s) => PathStep::Key(s.clone()),
            other => PathStep::Invalid(other.clone()),
        }
    }
}

impl From<u64> for PathStep {
    fn from(index: u64) -> Self {
        PathStep::Index(index)
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

/// Convert a decoded wire path (an array of values) into a [`Path`].
///
/// Order is preserved; each element is classified with
/// [`PathStep::from_value`].
pub fn path_from_values(values: &[Value]) -> Path {
    values.iter().map(PathStep::from_value).collect()
}
