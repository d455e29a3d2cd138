// crates/iam-harness-core/src/validator.rs
// ============================================================================
// Module: Output Validators
// Description: Named checks over scenario outputs and live endpoints.
// Purpose: Express provider assertions as data evaluated in a fixed order.
// Dependencies: regex, crate::{outputs, probe}
// ============================================================================

//! ## Overview
//! A [`Validator`] pairs a name with a [`Check`]. Checks are pure functions of
//! the [`OutputSet`] and an optional [`EndpointProbe`]; they hold no state and
//! never see the scenario configuration. Declarative variants cover the common
//! assertions and [`Check::Custom`] covers the rest.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::CheckFailure;
use crate::outputs::OutputSet;
use crate::probe::EndpointProbe;
use crate::probe::ExpectationSet;
use crate::probe::ProbeOutcome;

// ============================================================================
// SECTION: Output References
// ============================================================================

/// Reference to a scalar output or a single map entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRef {
    /// Scalar output by name.
    Scalar(String),
    /// Entry of a map output.
    MapEntry {
        /// Map output name.
        output: String,
        /// Entry key.
        key: String,
    },
}

impl OutputRef {
    /// References a map entry.
    #[must_use]
    pub fn entry(output: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MapEntry {
            output: output.into(),
            key: key.into(),
        }
    }

    /// Resolves the reference against an output set.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailure::Output`] when the output or entry is absent.
    pub fn resolve<'a>(&self, outputs: &'a OutputSet) -> Result<&'a str, CheckFailure> {
        let value = match self {
            Self::Scalar(name) => outputs.string(name)?,
            Self::MapEntry {
                output,
                key,
            } => outputs.map_entry(output, key)?,
        };
        Ok(value)
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => write!(f, "{name}"),
            Self::MapEntry {
                output,
                key,
            } => write!(f, "{output}[{key}]"),
        }
    }
}

impl From<&str> for OutputRef {
    fn from(name: &str) -> Self {
        Self::Scalar(name.to_string())
    }
}

impl From<String> for OutputRef {
    fn from(name: String) -> Self {
        Self::Scalar(name)
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Result of a passing check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Check passed outright.
    Passed,
    /// Check passed because a network failure was tolerated.
    Tolerated(String),
}

/// Signature of a custom check.
pub type CustomCheckFn =
    dyn Fn(&OutputSet, Option<&dyn EndpointProbe>) -> CheckResult + Send + Sync;

/// Result of a single check.
pub type CheckResult = Result<CheckOutcome, CheckFailure>;

/// Shared custom check closure.
#[derive(Clone)]
pub struct CustomCheck(Arc<CustomCheckFn>);

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck(..)")
    }
}

/// Check evaluated by a [`Validator`].
#[derive(Debug, Clone)]
pub enum Check {
    /// Value is not empty.
    NonEmpty(OutputRef),
    /// Value contains a fixed substring.
    Contains {
        /// Value under test.
        target: OutputRef,
        /// Required substring.
        fragment: String,
    },
    /// Value contains another output's value.
    ContainsOutput {
        /// Value under test.
        target: OutputRef,
        /// Output whose value must appear in the target.
        source: OutputRef,
    },
    /// Value matches a regular expression.
    Matches {
        /// Value under test.
        target: OutputRef,
        /// Pattern source, compiled when the check runs.
        pattern: String,
    },
    /// Value equals a fixed string.
    Equals {
        /// Value under test.
        target: OutputRef,
        /// Expected value.
        expected: String,
    },
    /// Value has an exact length in characters.
    Length {
        /// Value under test.
        target: OutputRef,
        /// Expected length.
        expected: usize,
    },
    /// Map output has at least one entry.
    MapNonEmpty(String),
    /// Map output has every listed key.
    MapHasKeys {
        /// Map output name.
        output: String,
        /// Required keys.
        keys: Vec<String>,
    },
    /// Every key of one map has a non-empty entry in another.
    MapCovers {
        /// Map whose keys drive the check.
        output: String,
        /// Map that must cover those keys.
        other: String,
    },
    /// Value is a URL that must satisfy a live probe.
    Probe {
        /// URL under test.
        target: OutputRef,
        /// Probe expectations.
        expectations: ExpectationSet,
    },
    /// Arbitrary check.
    Custom(CustomCheck),
}

impl Check {
    /// Wraps a closure as a custom check.
    #[must_use]
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&OutputSet, Option<&dyn EndpointProbe>) -> Result<CheckOutcome, CheckFailure>
            + Send
            + Sync
            + 'static,
    {
        Self::Custom(CustomCheck(Arc::new(check)))
    }

    /// Evaluates the check.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailure`] describing the first unmet expectation.
    pub fn evaluate(
        &self,
        outputs: &OutputSet,
        probe: Option<&dyn EndpointProbe>,
    ) -> Result<CheckOutcome, CheckFailure> {
        match self {
            Self::NonEmpty(target) => {
                let value = target.resolve(outputs)?;
                if value.is_empty() {
                    return Err(CheckFailure::mismatch(
                        format!("{target} is empty"),
                        "a non-empty value",
                    ));
                }
            }
            Self::Contains {
                target,
                fragment,
            } => {
                let value = target.resolve(outputs)?;
                if !value.contains(fragment.as_str()) {
                    return Err(CheckFailure::mismatch(
                        format!("{target} is \"{value}\""),
                        fragment.clone(),
                    ));
                }
            }
            Self::ContainsOutput {
                target,
                source,
            } => {
                let value = target.resolve(outputs)?;
                let needle = source.resolve(outputs)?;
                if needle.is_empty() || !value.contains(needle) {
                    return Err(CheckFailure::mismatch(
                        format!("{target} is \"{value}\", which does not contain {source}"),
                        needle,
                    ));
                }
            }
            Self::Matches {
                target,
                pattern,
            } => {
                let regex = Regex::new(pattern).map_err(|err| CheckFailure::InvalidPattern {
                    pattern: pattern.clone(),
                    message: err.to_string(),
                })?;
                let value = target.resolve(outputs)?;
                if !regex.is_match(value) {
                    return Err(CheckFailure::mismatch(
                        format!("{target} is \"{value}\""),
                        pattern.clone(),
                    ));
                }
            }
            Self::Equals {
                target,
                expected,
            } => {
                let value = target.resolve(outputs)?;
                if value != expected {
                    return Err(CheckFailure::mismatch(
                        format!("{target} is \"{value}\""),
                        expected.clone(),
                    ));
                }
            }
            Self::Length {
                target,
                expected,
            } => {
                let value = target.resolve(outputs)?;
                let actual = value.chars().count();
                if actual != *expected {
                    return Err(CheckFailure::mismatch(
                        format!("{target} has length {actual}"),
                        expected.to_string(),
                    ));
                }
            }
            Self::MapNonEmpty(output) => {
                if outputs.map(output)?.is_empty() {
                    return Err(CheckFailure::mismatch(
                        format!("map output `{output}` is empty"),
                        "at least one entry",
                    ));
                }
            }
            Self::MapHasKeys {
                output,
                keys,
            } => {
                let map = outputs.map(output)?;
                if let Some(missing) = keys.iter().find(|key| !map.contains_key(key.as_str())) {
                    return Err(CheckFailure::mismatch(
                        format!("map output `{output}` has no key `{missing}`"),
                        missing.clone(),
                    ));
                }
            }
            Self::MapCovers {
                output,
                other,
            } => {
                let keys = outputs.map(output)?;
                let cover = outputs.map(other)?;
                for key in keys.keys() {
                    if cover.get(key).is_none_or(String::is_empty) {
                        return Err(CheckFailure::mismatch(
                            format!("`{other}` has no non-empty entry for `{output}` key `{key}`"),
                            key.clone(),
                        ));
                    }
                }
            }
            Self::Probe {
                target,
                expectations,
            } => {
                let url = target.resolve(outputs)?;
                let probe = probe.ok_or(CheckFailure::ProbeUnavailable)?;
                return match probe.probe(url, expectations)? {
                    ProbeOutcome::Verified {
                        ..
                    } => Ok(CheckOutcome::Passed),
                    ProbeOutcome::Tolerated {
                        reason,
                    } => Ok(CheckOutcome::Tolerated(reason)),
                };
            }
            Self::Custom(CustomCheck(check)) => return (**check)(outputs, probe),
        }
        Ok(CheckOutcome::Passed)
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Named check run against scenario outputs.
#[derive(Debug, Clone)]
pub struct Validator {
    /// Validator name reported on failure.
    name: String,
    /// Check to evaluate.
    check: Check,
}

impl Validator {
    /// Creates a validator.
    #[must_use]
    pub fn new(name: impl Into<String>, check: Check) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }

    /// Requires a non-empty value.
    #[must_use]
    pub fn non_empty(name: impl Into<String>, target: impl Into<OutputRef>) -> Self {
        Self::new(name, Check::NonEmpty(target.into()))
    }

    /// Requires a value to contain a substring.
    #[must_use]
    pub fn contains(
        name: impl Into<String>,
        target: impl Into<OutputRef>,
        fragment: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Check::Contains {
                target: target.into(),
                fragment: fragment.into(),
            },
        )
    }

    /// Requires a value to match a regular expression.
    #[must_use]
    pub fn matches(
        name: impl Into<String>,
        target: impl Into<OutputRef>,
        pattern: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Check::Matches {
                target: target.into(),
                pattern: pattern.into(),
            },
        )
    }

    /// Requires a value to equal a fixed string.
    #[must_use]
    pub fn equals(
        name: impl Into<String>,
        target: impl Into<OutputRef>,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Check::Equals {
                target: target.into(),
                expected: expected.into(),
            },
        )
    }

    /// Requires a map output to carry every listed key.
    #[must_use]
    pub fn map_has_keys(name: impl Into<String>, output: impl Into<String>, keys: &[&str]) -> Self {
        Self::new(
            name,
            Check::MapHasKeys {
                output: output.into(),
                keys: keys.iter().map(ToString::to_string).collect(),
            },
        )
    }

    /// Requires a URL output to satisfy a live probe.
    #[must_use]
    pub fn probe(
        name: impl Into<String>,
        target: impl Into<OutputRef>,
        expectations: ExpectationSet,
    ) -> Self {
        Self::new(
            name,
            Check::Probe {
                target: target.into(),
                expectations,
            },
        )
    }

    /// Wraps a closure as a validator.
    #[must_use]
    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&OutputSet, Option<&dyn EndpointProbe>) -> Result<CheckOutcome, CheckFailure>
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, Check::custom(check))
    }

    /// Returns the validator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the check.
    #[must_use]
    pub const fn check(&self) -> &Check {
        &self.check
    }

    /// Runs the check.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailure`] when the check fails.
    pub fn validate(
        &self,
        outputs: &OutputSet,
        probe: Option<&dyn EndpointProbe>,
    ) -> Result<CheckOutcome, CheckFailure> {
        self.check.evaluate(outputs, probe)
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod validator_tests;
