//! Policy selection from configuration.
//!
//! ```toml
//! on_failure = "log"   # or "fatal" (default)
//! label = "nightly-import"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::policy::ErrorPolicy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Escalate every failure.
    #[default]
    Fatal,
    /// Log at `warn` and recover.
    Log,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub on_failure: FailureMode,
    pub label: Option<String>,
}

impl PolicyConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Policy for void-compatible shapes.
    pub fn policy(&self) -> ErrorPolicy {
        match self.on_failure {
            FailureMode::Fatal => ErrorPolicy::Default,
            FailureMode::Log => ErrorPolicy::log_and_continue(self.label.clone()),
        }
    }

    /// Policy for value-returning shapes; `fallback` is the result whenever
    /// a failure is logged and recovered.
    pub fn policy_or<T>(&self, fallback: T) -> ErrorPolicy<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        match self.on_failure {
            FailureMode::Fatal => ErrorPolicy::Default,
            FailureMode::Log => ErrorPolicy::log_or(self.label.clone(), fallback),
        }
    }
}
