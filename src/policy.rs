//! Error translation policies.
//!
//! A policy decides what happens to a [`WorkError`]: escalate it
//! (`Default`) or hand it to a custom handler that may recover. Value
//! returning shapes recover with a value supplied by the handler itself or
//! pre-configured by the caller; there is no implicit default result.

use std::fmt;

use tracing::{debug, warn};

use crate::error::{PolicyError, UnrecoverableError, WorkError};
use crate::unit::{Receiver, Transformer};

/// How a failing unit of work is settled. `T` is the shape's result type,
/// `()` for void-compatible shapes.
pub enum ErrorPolicy<T = ()> {
    /// Escalate every failure as [`UnrecoverableError::Fatal`].
    Default,
    /// Run the handler. Its value is the recovered result; its failure is
    /// escalated as [`UnrecoverableError::Policy`].
    Custom(Transformer<WorkError, T>),
}

impl ErrorPolicy<()> {
    /// Receiver-shaped handler for void-compatible shapes. Returning normally
    /// means the failure was handled.
    pub fn custom(handler: Receiver<WorkError>) -> Self {
        ErrorPolicy::Custom(Transformer::new(move |err: WorkError| {
            handler.run(err).map_err(WorkError::into_cause)
        }))
    }

    /// Log the failure at `warn` and carry on.
    pub fn log_and_continue(label: Option<String>) -> Self {
        ErrorPolicy::custom(log_receiver(label))
    }
}

impl<T> ErrorPolicy<T> {
    /// Handler computes the recovered value from the failure.
    pub fn recover(handler: Transformer<WorkError, T>) -> Self {
        ErrorPolicy::Custom(handler)
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ErrorPolicy::Default)
    }

    /// Settle an outcome: successes pass through untouched, failures go to
    /// the policy.
    pub fn apply(&self, outcome: Result<T, WorkError>) -> Result<T, UnrecoverableError> {
        outcome.or_else(|err| self.settle(err))
    }

    fn settle(&self, err: WorkError) -> Result<T, UnrecoverableError> {
        match self {
            ErrorPolicy::Default => {
                warn!(error = %err, "unit of work failed, escalating");
                Err(UnrecoverableError::Fatal(err))
            }
            ErrorPolicy::Custom(handler) => {
                let original = err.to_string();
                match handler.run(err) {
                    Ok(value) => {
                        debug!(error = %original, "error policy recovered");
                        Ok(value)
                    }
                    Err(failure) => {
                        warn!(
                            error = %original,
                            handler_error = %failure,
                            "error handler failed, escalating"
                        );
                        Err(PolicyError::new(failure, original).into())
                    }
                }
            }
        }
    }
}

impl<T: 'static> ErrorPolicy<T> {
    /// The same policy for a void-compatible shape; a recovered value is
    /// dropped.
    pub fn discarding(self) -> ErrorPolicy<()> {
        match self {
            ErrorPolicy::Default => ErrorPolicy::Default,
            ErrorPolicy::Custom(handler) => {
                ErrorPolicy::Custom(Transformer::new(move |err: WorkError| {
                    handler.run(err).map(|_| ()).map_err(WorkError::into_cause)
                }))
            }
        }
    }
}

impl<T> ErrorPolicy<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Receiver-shaped handler for a value-returning shape. When the handler
    /// returns normally the caller's `fallback` is the result.
    pub fn custom_or(handler: Receiver<WorkError>, fallback: T) -> Self {
        ErrorPolicy::Custom(Transformer::new(move |err: WorkError| {
            handler.run(err).map_err(WorkError::into_cause)?;
            Ok(fallback.clone())
        }))
    }

    pub fn log_or(label: Option<String>, fallback: T) -> Self {
        ErrorPolicy::custom_or(log_receiver(label), fallback)
    }
}

fn log_receiver(label: Option<String>) -> Receiver<WorkError> {
    Receiver::infallible(move |err: WorkError| match &label {
        Some(label) => warn!(label = %label, error = %err, "unit of work failed, continuing"),
        None => warn!(error = %err, "unit of work failed, continuing"),
    })
}

impl<T> Clone for ErrorPolicy<T> {
    fn clone(&self) -> Self {
        match self {
            ErrorPolicy::Default => ErrorPolicy::Default,
            ErrorPolicy::Custom(handler) => ErrorPolicy::Custom(handler.clone()),
        }
    }
}

impl<T> Default for ErrorPolicy<T> {
    fn default() -> Self {
        ErrorPolicy::Default
    }
}

impl<T> fmt::Debug for ErrorPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Default => f.write_str("ErrorPolicy::Default"),
            ErrorPolicy::Custom(_) => f.write_str("ErrorPolicy::Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_default_escalates() {
        let policy: ErrorPolicy<i32> = ErrorPolicy::Default;
        let err = policy.apply(Err(WorkError::msg("boom"))).unwrap_err();

        assert!(matches!(err, UnrecoverableError::Fatal(_)));
        assert_eq!(err.cause().to_string(), "boom");
    }

    #[test]
    fn test_success_passes_through() {
        let policy: ErrorPolicy<i32> =
            ErrorPolicy::recover(Transformer::new(|_: WorkError| bail!("handler must not run")));
        assert_eq!(policy.apply(Ok(7)).unwrap(), 7);
    }

    #[test]
    fn test_recover_supplies_value() {
        let policy = ErrorPolicy::recover(Transformer::infallible(|err: WorkError| {
            err.to_string().len()
        }));
        assert_eq!(policy.apply(Err(WorkError::msg("four"))).unwrap(), 4);
    }

    #[test]
    fn test_custom_or_uses_fallback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let policy = ErrorPolicy::custom_or(
            Receiver::infallible(move |err: WorkError| log.lock().unwrap().push(err.to_string())),
            -1,
        );

        assert_eq!(policy.apply(Err(WorkError::msg("bad row"))).unwrap(), -1);
        assert_eq!(*seen.lock().unwrap(), vec!["bad row".to_string()]);
    }

    #[test]
    fn test_handler_failure_is_policy_error() {
        let policy = ErrorPolicy::custom(Receiver::new(|_: WorkError| bail!("translated")));
        let err = policy.apply(Err(WorkError::msg("disk full"))).unwrap_err();

        match err {
            UnrecoverableError::Policy(policy_err) => {
                assert_eq!(policy_err.cause().to_string(), "translated");
                assert_eq!(policy_err.original(), "disk full");
            }
            other => panic!("expected policy failure, got {other:?}"),
        }
    }

    #[test]
    fn test_discarding_keeps_handler() {
        let policy = ErrorPolicy::<i32>::recover(Transformer::new(|_: WorkError| bail!("nope")))
            .discarding();
        let err = policy.apply(Err(WorkError::msg("x"))).unwrap_err();
        assert!(err.is_policy_failure());

        let quiet = ErrorPolicy::recover(Transformer::infallible(|_: WorkError| 0u8)).discarding();
        assert!(quiet.apply(Err(WorkError::msg("x"))).is_ok());
    }

    #[test]
    fn test_log_and_continue_recovers() {
        let policy = ErrorPolicy::log_and_continue(Some("import".to_string()));
        assert!(policy.apply(Err(WorkError::msg("skip me"))).is_ok());
    }
}
