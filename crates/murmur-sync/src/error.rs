use thiserror::Error;

/// Failures a messaging backend can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Transient failure; the operation had no effect and may be retried.
    #[error("{operation} failed: backend unavailable")]
    Unavailable { operation: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    OutOfRange { var: &'static str, reason: &'static str },
}
