//! Dispatch error types.
//!
//! Every failure carries the offending input and, where there is one, the
//! set of valid alternatives. Nothing is retried or defaulted.

use thiserror::Error;

use crate::collectors::{InvocationError, LoadError, UnitId};
use crate::versions::ResolveError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown framework: {namespace}. Supported: {known:?}")]
    UnknownNamespace { namespace: String, known: Vec<String> },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Implementation unit {unit} not found. Make sure {unit} is registered with the loader.")]
    ImplementationNotFound { unit: UnitId },

    #[error("Failed to load implementation unit {unit}: {reason}")]
    LoadFailed { unit: UnitId, reason: String },

    #[error("Collector {unit} (version {version}) has no function '{function}'. Available: {available:?}")]
    FunctionNotFound {
        unit: UnitId,
        version: String,
        function: String,
        available: Vec<String>,
    },

    /// Raised by the collector function itself.
    #[error("{0}")]
    Invocation(#[source] InvocationError),
}

impl From<LoadError> for DispatchError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound(unit) => Self::ImplementationNotFound { unit },
            LoadError::Failed { unit, reason } => Self::LoadFailed { unit, reason },
        }
    }
}

impl DispatchError {
    /// True when the requested namespace/operation/version/unit/function
    /// does not exist, as opposed to a failure while loading or running it.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownNamespace { .. }
                | Self::Resolve(_)
                | Self::ImplementationNotFound { .. }
                | Self::FunctionNotFound { .. }
        )
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation(_))
    }

    /// Short label used for metrics and span fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownNamespace { .. } => "unknown_namespace",
            Self::Resolve(ResolveError::UnknownOperation { .. }) => "unknown_operation",
            Self::Resolve(ResolveError::UnsupportedVersion { .. }) => "unsupported_version",
            Self::ImplementationNotFound { .. } => "implementation_not_found",
            Self::LoadFailed { .. } => "load_failed",
            Self::FunctionNotFound { .. } => "function_not_found",
            Self::Invocation(_) => "invocation_error",
        }
    }

    /// Recover the collector's own error.
    pub fn into_invocation_error(self) -> Result<InvocationError, Self> {
        match self {
            Self::Invocation(err) => Ok(err),
            other => Err(other),
        }
    }
}
