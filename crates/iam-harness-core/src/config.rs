// crates/iam-harness-core/src/config.rs
// ============================================================================
// Module: Scenario Configuration
// Description: Immutable configuration bundle for a single scenario run.
// Purpose: Capture stack location, variables, environment, and retry policy.
// Dependencies: regex, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ScenarioConfig`] is assembled once through [`ScenarioConfigBuilder`]
//! and handed to the runner. Builder errors are deferred to
//! [`ScenarioConfigBuilder::build`] so scenario definitions read as a single
//! chain.
//! Invariants:
//! - A built config is never mutated.
//! - A step runs at most `retry_policy.max_attempts + 1` times.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::ConfigError;

// ============================================================================
// SECTION: Retry Policy
// ============================================================================

/// Engine error patterns treated as transient by default.
const DEFAULT_RETRYABLE_ERRORS: &[(&str, &str)] = &[
    (r"read: connection reset by peer", "Transient network reset while reaching a registry."),
    (r"TLS handshake timeout", "Transient TLS handshake timeout."),
    (r"Client\.Timeout exceeded while awaiting headers", "Transient HTTP client timeout."),
    (r"transport is closing", "Provider plugin connection dropped."),
    (r"unable to verify (signature|checksum)", "Provider download was interrupted."),
    (r"registry service is unreachable", "Provider registry was unreachable."),
    (r"could not query provider registry for", "Provider registry was unreachable."),
    (r"Failed to query available provider packages", "Provider registry was unreachable."),
    (r"Error installing provider", "Provider download was interrupted."),
    (r"timeout while waiting for plugin to start", "Provider plugin start timed out."),
    (r"timed out waiting for server handshake", "Provider plugin handshake timed out."),
    (r"Could not download module", "Module source was unreachable."),
];

/// Engine error pattern that marks a failure as transient.
#[derive(Debug, Clone)]
pub struct RetryableError {
    /// Compiled pattern matched against engine diagnostics.
    pattern: Regex,
    /// Human-readable reason recorded when the pattern matches.
    description: String,
}

impl RetryableError {
    /// Compiles a retryable error pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when the pattern does not compile.
    pub fn new(pattern: &str, description: impl Into<String>) -> Result<Self, ConfigError> {
        let compiled = Regex::new(pattern).map_err(|err| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            description: description.into(),
        })
    }

    /// Returns true when the engine message matches this pattern.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }

    /// Returns the pattern source text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the human-readable reason.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Retry policy for transient provisioning failures.
///
/// # Invariants
/// - `max_attempts` counts reattempts after the first try; zero disables retry.
/// - Only failures matching a retryable pattern are reattempted.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Reattempts allowed per engine step after the initial try.
    max_attempts: u32,
    /// Fixed pause between attempts.
    backoff_interval: Duration,
    /// Patterns that classify a failure as transient.
    retryable_errors: Vec<RetryableError>,
}

impl RetryPolicy {
    /// Reattempts used by [`RetryPolicy::standard`].
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Backoff used by [`RetryPolicy::standard`].
    pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

    /// Creates a policy with the default retryable error patterns.
    #[must_use]
    pub fn new(max_attempts: u32, backoff_interval: Duration) -> Self {
        Self {
            max_attempts,
            backoff_interval,
            retryable_errors: default_retryable_errors(),
        }
    }

    /// Up to three reattempts, five seconds apart, default transient patterns.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            backoff_interval: Self::DEFAULT_BACKOFF,
            retryable_errors: default_retryable_errors(),
        }
    }

    /// Single attempt, no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff_interval: Duration::ZERO,
            retryable_errors: Vec::new(),
        }
    }

    /// Adds a retryable error pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when the pattern does not compile.
    pub fn with_retryable_error(
        mut self,
        pattern: &str,
        description: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        self.retryable_errors.push(RetryableError::new(pattern, description)?);
        Ok(self)
    }

    /// Replaces the backoff interval.
    #[must_use]
    pub fn with_backoff(mut self, backoff_interval: Duration) -> Self {
        self.backoff_interval = backoff_interval;
        self
    }

    /// Returns the reattempts allowed per step.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the pause between attempts.
    #[must_use]
    pub const fn backoff_interval(&self) -> Duration {
        self.backoff_interval
    }

    /// Returns the configured retryable patterns.
    #[must_use]
    pub fn retryable_errors(&self) -> &[RetryableError] {
        &self.retryable_errors
    }

    /// Returns the first retryable pattern matching `message`.
    #[must_use]
    pub fn classify(&self, message: &str) -> Option<&RetryableError> {
        self.retryable_errors.iter().find(|candidate| candidate.matches(message))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn default_retryable_errors() -> Vec<RetryableError> {
    DEFAULT_RETRYABLE_ERRORS
        .iter()
        .filter_map(|(pattern, description)| RetryableError::new(pattern, *description).ok())
        .collect()
}

// ============================================================================
// SECTION: Scenario Configuration
// ============================================================================

/// Immutable configuration for one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Scenario name used in events and teardown diagnostics.
    name: String,
    /// Stack directory, relative to the engine's stack root.
    stack_location: PathBuf,
    /// Stack input variables.
    variables: Map<String, Value>,
    /// Environment variables set on the engine process.
    environment_overrides: BTreeMap<String, String>,
    /// Retry policy for provisioning steps.
    retry_policy: RetryPolicy,
}

impl ScenarioConfig {
    /// Starts building a scenario configuration.
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        stack_location: impl Into<PathBuf>,
    ) -> ScenarioConfigBuilder {
        ScenarioConfigBuilder {
            name: name.into(),
            stack_location: stack_location.into(),
            variables: Map::new(),
            environment_overrides: BTreeMap::new(),
            retry_policy: RetryPolicy::none(),
            error: None,
        }
    }

    /// Returns the scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stack location.
    #[must_use]
    pub fn stack_location(&self) -> &Path {
        &self.stack_location
    }

    /// Returns the stack variables.
    #[must_use]
    pub const fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }

    /// Returns a single variable.
    #[must_use]
    pub fn variable(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    /// Returns the engine environment overrides.
    #[must_use]
    pub const fn environment_overrides(&self) -> &BTreeMap<String, String> {
        &self.environment_overrides
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }
}

/// Builder for [`ScenarioConfig`].
///
/// The first error encountered is kept and returned from [`Self::build`].
#[derive(Debug)]
pub struct ScenarioConfigBuilder {
    /// Scenario name.
    name: String,
    /// Stack location.
    stack_location: PathBuf,
    /// Variables collected so far.
    variables: Map<String, Value>,
    /// Environment overrides collected so far.
    environment_overrides: BTreeMap<String, String>,
    /// Retry policy.
    retry_policy: RetryPolicy,
    /// First deferred error.
    error: Option<ConfigError>,
}

impl ScenarioConfigBuilder {
    /// Sets a single variable, replacing any previous value.
    #[must_use]
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Merges every field of a serializable schema into the variables.
    ///
    /// Fields serialized as `null` are skipped so the stack default applies.
    #[must_use]
    pub fn variables<T: Serialize>(mut self, schema: &T) -> Self {
        match serde_json::to_value(schema) {
            Ok(Value::Object(fields)) => {
                for (key, value) in fields {
                    if !value.is_null() {
                        self.variables.insert(key, value);
                    }
                }
            }
            Ok(other) => {
                self.record_error(ConfigError::Variables(format!("got {}", json_kind(&other))));
            }
            Err(err) => self.record_error(ConfigError::Variables(err.to_string())),
        }
        self
    }

    /// Sets an environment variable on the engine process.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment_overrides.insert(key.into(), value.into());
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Finalizes the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first deferred [`ConfigError`], or an error for an empty
    /// name or stack location.
    pub fn build(self) -> Result<ScenarioConfig, ConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.stack_location.as_os_str().is_empty() {
            return Err(ConfigError::EmptyStackLocation);
        }
        Ok(ScenarioConfig {
            name: self.name,
            stack_location: self.stack_location,
            variables: self.variables,
            environment_overrides: self.environment_overrides,
            retry_policy: self.retry_policy,
        })
    }

    fn record_error(&mut self, err: ConfigError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
