#![forbid(unsafe_code)]

//! Errors raised while building nodes.

/// A host document rejected an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    /// The host operation that failed (e.g. `"create_element"`).
    pub op: &'static str,
    /// Host-provided detail.
    pub message: String,
}

impl HostError {
    pub fn new(op: &'static str, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "host operation {} failed: {}", self.op, self.message)
    }
}

impl std::error::Error for HostError {}

/// Errors from [`Materializer::h`](crate::Materializer::h).
///
/// Materialization is not transactional: when an error is returned, the
/// partially built element is abandoned and any listeners or bindings
/// already attached to it stay registered until the cleanup registry is
/// flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterializeError {
    /// A property value whose type cannot be applied to its key, e.g. a
    /// number for `style`.
    InvalidPropertyValue {
        key: String,
        /// Short name of the offending value's type.
        found: &'static str,
    },
    /// The host rejected a node or tree operation.
    Host(HostError),
}

impl std::fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPropertyValue { key, found } => {
                write!(f, "invalid value for property {key:?}: {found}")
            }
            Self::Host(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MaterializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(err) => Some(err),
            Self::InvalidPropertyValue { .. } => None,
        }
    }
}

impl From<HostError> for MaterializeError {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}
