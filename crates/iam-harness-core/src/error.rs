// crates/iam-harness-core/src/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Error taxonomy for scenario provisioning and validation.
// Purpose: Give each failure class a stable type callers can match on.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Failures are split by where they happen: [`ConfigError`] before anything
//! runs, [`ProvisionError`] and [`ValidationError`] at the engine boundary,
//! [`AssertionFailure`] while validating outputs, and [`TeardownError`] on the
//! way out. [`ScenarioFailure`] pairs the primary error with an optional
//! secondary teardown failure so cleanup problems never hide the real cause.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::engine::EngineStep;
use crate::lifecycle::ScenarioState;

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Scenario configuration errors, raised before any engine call.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Scenario name was empty.
    #[error("scenario name must not be empty")]
    EmptyName,
    /// Stack location was empty.
    #[error("stack location must not be empty")]
    EmptyStackLocation,
    /// Variables did not serialize into a JSON object.
    #[error("scenario variables must serialize to an object: {0}")]
    Variables(String),
    /// Retryable error pattern failed to compile.
    #[error("retryable error pattern `{pattern}` is invalid: {message}")]
    InvalidPattern {
        /// Offending pattern text.
        pattern: String,
        /// Compiler message.
        message: String,
    },
}

// ============================================================================
// SECTION: Engine Boundary Errors
// ============================================================================

/// Engine-level failure while provisioning a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step} failed after {attempts} attempt(s): {message}")]
pub struct ProvisionError {
    /// Engine step that failed.
    pub step: EngineStep,
    /// Number of attempts made, including the failing one.
    pub attempts: u32,
    /// Engine diagnostic text.
    pub message: String,
}

/// Configuration rejected by the engine before any resource was created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration rejected before provisioning: {message}")]
pub struct ValidationError {
    /// Engine diagnostic text, unmodified.
    pub message: String,
}

impl ValidationError {
    /// Returns true when the engine message contains `fragment`.
    ///
    /// The raw text is checked first; a second comparison ignores diagnostic
    /// gutters and line wrapping so long messages still match.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.message.contains(fragment)
            || normalize_diagnostic(&self.message).contains(&normalize_diagnostic(fragment))
    }
}

/// Collapses whitespace and strips box-drawing gutters from engine output.
#[must_use]
pub fn normalize_diagnostic(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !matches!(*token, "│" | "╷" | "╵"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Teardown failure. Always secondary to any primary failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("teardown of `{scenario}` failed: {message}")]
pub struct TeardownError {
    /// Scenario name.
    pub scenario: String,
    /// Engine diagnostic text.
    pub message: String,
}

// ============================================================================
// SECTION: Output Errors
// ============================================================================

/// Output lookup and parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// Output name is absent from the set.
    #[error("output not found: {name}")]
    NotFound {
        /// Requested output name.
        name: String,
    },
    /// Output exists but has the wrong shape.
    #[error("output `{name}` is a {actual}, expected a {expected}")]
    KindMismatch {
        /// Requested output name.
        name: String,
        /// Expected shape label.
        expected: &'static str,
        /// Actual shape label.
        actual: &'static str,
    },
    /// Map output lacks the requested entry.
    #[error("output `{name}` has no entry `{key}`")]
    MissingEntry {
        /// Map output name.
        name: String,
        /// Missing entry key.
        key: String,
    },
    /// Engine output payload could not be parsed.
    #[error("engine outputs could not be parsed: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Probe Errors
// ============================================================================

/// Endpoint probe failures.
///
/// # Invariants
/// - Every variant names the probed URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// URL could not be parsed.
    #[error("invalid probe url `{url}`: {message}")]
    InvalidUrl {
        /// Probed URL.
        url: String,
        /// Parse failure.
        message: String,
    },
    /// Network-level failure.
    #[error("GET {url} failed: {message}")]
    Transport {
        /// Probed URL.
        url: String,
        /// Transport error text.
        message: String,
    },
    /// Request exceeded the probe timeout.
    #[error("GET {url} timed out after {timeout_ms}ms")]
    Timeout {
        /// Probed URL.
        url: String,
        /// Configured timeout.
        timeout_ms: u128,
    },
    /// Unexpected HTTP status.
    #[error("GET {url} returned status {status}, expected {expected}")]
    Status {
        /// Probed URL.
        url: String,
        /// Status received.
        status: u16,
        /// Human-readable expectation.
        expected: String,
    },
    /// Body was not a JSON object.
    #[error("GET {url} returned a body that is not a JSON object: {message}")]
    Body {
        /// Probed URL.
        url: String,
        /// Decode failure.
        message: String,
    },
    /// Required document key is absent.
    #[error("document at {url} is missing key `{key}`")]
    MissingKey {
        /// Probed URL.
        url: String,
        /// Missing key.
        key: String,
    },
    /// Array or string field lacks a required value.
    #[error("document at {url}: `{field}` does not contain \"{expected}\"")]
    MissingValue {
        /// Probed URL.
        url: String,
        /// Field inspected.
        field: String,
        /// Value that was required.
        expected: String,
    },
    /// Field value differs from the expected value.
    #[error("document at {url}: `{field}` is {actual}, expected {expected}")]
    FieldMismatch {
        /// Probed URL.
        url: String,
        /// Field inspected.
        field: String,
        /// Actual JSON rendering.
        actual: String,
        /// Expected JSON rendering.
        expected: String,
    },
    /// Content type does not contain the required fragment.
    #[error("GET {url} returned content type `{actual}`, expected it to contain `{expected}`")]
    ContentType {
        /// Probed URL.
        url: String,
        /// Content type received (empty when absent).
        actual: String,
        /// Required fragment.
        expected: String,
    },
}

// ============================================================================
// SECTION: Validator Failures
// ============================================================================

/// Why a single check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckFailure {
    /// Output lookup failed.
    #[error(transparent)]
    Output(#[from] OutputError),
    /// Endpoint probe failed.
    #[error(transparent)]
    Probe(#[from] ProbeError),
    /// Value did not meet the expectation.
    #[error("{message} (expected {expected})")]
    Mismatch {
        /// Diagnostic describing what was observed.
        message: String,
        /// Expected value or substring.
        expected: String,
    },
    /// Check needs an endpoint probe but none was configured.
    #[error("check requires an endpoint probe but the runner has none")]
    ProbeUnavailable,
    /// Pattern in a regex check failed to compile.
    #[error("pattern `{pattern}` is invalid: {message}")]
    InvalidPattern {
        /// Pattern text.
        pattern: String,
        /// Compiler message.
        message: String,
    },
}

impl CheckFailure {
    /// Builds a mismatch failure.
    #[must_use]
    pub fn mismatch(message: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Mismatch {
            message: message.into(),
            expected: expected.into(),
        }
    }
}

/// First failing validator of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validator `{validator}` failed: {cause}")]
pub struct AssertionFailure {
    /// Validator name.
    pub validator: String,
    /// Underlying failure.
    #[source]
    pub cause: CheckFailure,
}

impl AssertionFailure {
    /// Returns the expected value or substring when the failure carries one.
    #[must_use]
    pub fn expected(&self) -> Option<&str> {
        match &self.cause {
            CheckFailure::Mismatch {
                expected, ..
            } => Some(expected),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Lifecycle Errors
// ============================================================================

/// Illegal lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal scenario transition {from} -> {to}")]
pub struct StateError {
    /// State before the attempted transition.
    pub from: ScenarioState,
    /// Requested state.
    pub to: ScenarioState,
}

// ============================================================================
// SECTION: Scenario Errors
// ============================================================================

/// Primary scenario error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Provisioning failed.
    #[error(transparent)]
    Provision(#[from] ProvisionError),
    /// Configuration rejected at plan time.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Outputs unavailable or malformed.
    #[error(transparent)]
    Output(#[from] OutputError),
    /// A validator failed.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
    /// Lifecycle misuse.
    #[error(transparent)]
    State(#[from] StateError),
    /// Teardown failed after an otherwise successful scenario.
    #[error(transparent)]
    Teardown(#[from] TeardownError),
}

/// Scenario failure with an optional secondary teardown error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioFailure {
    /// Primary error.
    pub error: ScenarioError,
    /// Teardown failure observed while unwinding, if any.
    pub teardown: Option<TeardownError>,
}

impl ScenarioFailure {
    /// Returns the plan-time validation error, if that was the cause.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match &self.error {
            ScenarioError::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the provisioning error, if that was the cause.
    #[must_use]
    pub fn provision(&self) -> Option<&ProvisionError> {
        match &self.error {
            ScenarioError::Provision(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the failing assertion, if that was the cause.
    #[must_use]
    pub fn assertion(&self) -> Option<&AssertionFailure> {
        match &self.error {
            ScenarioError::Assertion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScenarioError> for ScenarioFailure {
    fn from(error: ScenarioError) -> Self {
        Self {
            error,
            teardown: None,
        }
    }
}

impl From<AssertionFailure> for ScenarioFailure {
    fn from(error: AssertionFailure) -> Self {
        ScenarioError::from(error).into()
    }
}

impl From<StateError> for ScenarioFailure {
    fn from(error: StateError) -> Self {
        ScenarioError::from(error).into()
    }
}

impl fmt::Display for ScenarioFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(teardown) = &self.teardown {
            write!(f, "; {teardown}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ScenarioFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
