//! Error taxonomy.
//!
//! `WorkError` is the recoverable failure of a unit of work and never leaves
//! the adapter. `UnrecoverableError` is the only error an adapted callable
//! returns. Overload admission and configuration have their own enums.

use std::path::PathBuf;

use thiserror::Error;

use crate::shape::Shape;

/// A recoverable failure raised while a unit of work ran. Display and
/// `source()` are those of the cause.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct WorkError {
    cause: anyhow::Error,
}

impl WorkError {
    pub fn new(cause: impl Into<anyhow::Error>) -> Self {
        WorkError {
            cause: cause.into(),
        }
    }

    /// Shorthand for a failure that only carries a message.
    pub fn msg(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        WorkError {
            cause: anyhow::Error::msg(message),
        }
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    pub fn into_cause(self) -> anyhow::Error {
        self.cause
    }
}

/// Raised when a custom error handler itself fails.
#[derive(Debug, Error)]
#[error("error handler failed")]
pub struct PolicyError {
    #[source]
    cause: anyhow::Error,
    original: String,
}

impl PolicyError {
    pub(crate) fn new(handler_failure: WorkError, original: String) -> Self {
        PolicyError {
            cause: handler_failure.into_cause(),
            original,
        }
    }

    /// The handler's own failure.
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// Rendered message of the failure the handler was asked to deal with.
    pub fn original(&self) -> &str {
        &self.original
    }
}

/// Terminal failure of an adapted callable. Callers are expected to abort the
/// current operation when they see one.
#[derive(Debug, Error)]
pub enum UnrecoverableError {
    /// The default policy escalated the unit's failure unchanged.
    #[error("unit of work failed")]
    Fatal(#[source] WorkError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl UnrecoverableError {
    /// Root cause: the unit's cause for `Fatal`, the handler's for `Policy`.
    pub fn cause(&self) -> &anyhow::Error {
        match self {
            UnrecoverableError::Fatal(work) => work.cause(),
            UnrecoverableError::Policy(policy) => policy.cause(),
        }
    }

    pub fn is_policy_failure(&self) -> bool {
        matches!(self, UnrecoverableError::Policy(_))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OverloadError {
    #[error(
        "`{operation}` already accepts a {shape} target; expose this entry point as `{suggestion}` instead"
    )]
    Forbidden {
        operation: String,
        shape: Shape,
        suggestion: String,
    },
    #[error(
        "`{operation}` cannot accept a {shape} target with a generic operation; pass a named implementation instead"
    )]
    GenericTarget { operation: String, shape: Shape },
    #[error("`{operation}` declares no entry points")]
    Empty { operation: String },
    #[error("`{operation}` has no entry point for a {shape} target")]
    NoMatch { operation: String, shape: Shape },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read policy config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid policy config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_keeps_original_cause() {
        let err = UnrecoverableError::Fatal(WorkError::msg("disk full"));
        assert_eq!(err.cause().to_string(), "disk full");
        assert_eq!(err.to_string(), "unit of work failed");
        assert!(!err.is_policy_failure());
    }

    #[test]
    fn test_policy_failure_reports_handler_cause() {
        let policy = PolicyError::new(WorkError::msg("translated"), "disk full".to_string());
        let err = UnrecoverableError::from(policy);
        assert!(err.is_policy_failure());
        assert_eq!(err.cause().to_string(), "translated");
        assert_eq!(err.to_string(), "error handler failed");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("translated".to_string())
        );
    }

    fn chain(err: &dyn std::error::Error) -> Vec<String> {
        std::iter::successors(Some(err), |e| e.source())
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_fatal_chain_reaches_io_error() {
        use anyhow::Context;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "policy.toml missing");
        let cause = Err::<(), _>(io).context("loading settings").unwrap_err();
        let err = UnrecoverableError::Fatal(WorkError::new(cause));

        assert_eq!(
            chain(&err),
            vec![
                "unit of work failed".to_string(),
                "loading settings".to_string(),
                "policy.toml missing".to_string(),
            ]
        );
        assert_eq!(
            format!("{:#}", anyhow::Error::new(err)),
            "unit of work failed: loading settings: policy.toml missing"
        );
    }

    #[test]
    fn test_work_error_wraps_std_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
        let err = WorkError::new(io);
        assert_eq!(err.to_string(), "missing.txt");
        assert!(err.cause().downcast_ref::<std::io::Error>().is_some());
    }
}
