// crates/iam-harness-core/src/probe.rs
// ============================================================================
// Module: Endpoint Probe Interface
// Description: Expectation classes and document checks for live endpoints.
// Purpose: Describe what a probed identity endpoint must return.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! An [`EndpointProbe`] issues a single GET and judges the response against
//! an [`ExpectationSet`]. The network side lives in the providers crate; the
//! document checks here are pure so they can be tested without a server.
//! Invariants:
//! - Discovery, metadata, and JSON field expectations fail hard on timeouts
//!   and bad statuses.
//! - Redirect and reachability expectations tolerate network errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::error::ProbeError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default per-request probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Keys every OpenID discovery document must carry.
pub const DISCOVERY_REQUIRED_KEYS: [&str; 5] =
    ["issuer", "authorization_endpoint", "token_endpoint", "userinfo_endpoint", "jwks_uri"];

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// Requirements on an OpenID discovery document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryExpectations {
    /// Keys that must be present.
    pub required_keys: Vec<String>,
    /// Values `response_types_supported` must contain.
    pub response_types: Vec<String>,
    /// Values `scopes_supported` must contain.
    pub scopes: Vec<String>,
    /// Fragment the `issuer` must contain.
    pub issuer_fragment: Option<String>,
}

impl DiscoveryExpectations {
    /// The five standard keys and the `code` response type.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            required_keys: DISCOVERY_REQUIRED_KEYS.iter().map(ToString::to_string).collect(),
            response_types: vec!["code".to_string()],
            scopes: Vec::new(),
            issuer_fragment: None,
        }
    }

    /// Requires an additional document key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.required_keys.push(key.into());
        self
    }

    /// Requires a supported scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Requires the issuer to contain a fragment.
    #[must_use]
    pub fn with_issuer_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.issuer_fragment = Some(fragment.into());
        self
    }
}

impl Default for DiscoveryExpectations {
    fn default() -> Self {
        Self::standard()
    }
}

/// What a probed endpoint must return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectationSet {
    /// 2xx JSON discovery document meeting the expectations.
    Discovery(DiscoveryExpectations),
    /// Status of at least 300 with redirects disabled.
    Redirect,
    /// 200 with a content type containing the fragment.
    Metadata {
        /// Required content type fragment.
        content_type_fragment: String,
    },
    /// 200 JSON object whose listed fields equal the given values.
    JsonFields(BTreeMap<String, Value>),
    /// Any HTTP response.
    Reachable,
}

impl ExpectationSet {
    /// Standard discovery expectations.
    #[must_use]
    pub fn discovery() -> Self {
        Self::Discovery(DiscoveryExpectations::standard())
    }

    /// SAML metadata: an XML content type.
    #[must_use]
    pub fn saml_metadata() -> Self {
        Self::Metadata {
            content_type_fragment: "xml".to_string(),
        }
    }

    /// Severity of network failures for this expectation.
    #[must_use]
    pub const fn severity(&self) -> ProbeSeverity {
        match self {
            Self::Redirect | Self::Reachable => ProbeSeverity::Advisory,
            Self::Discovery(_) | Self::Metadata { .. } | Self::JsonFields(_) => {
                ProbeSeverity::Fatal
            }
        }
    }

    /// Stable label for events and diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Discovery(_) => "discovery",
            Self::Redirect => "redirect",
            Self::Metadata { .. } => "metadata",
            Self::JsonFields(_) => "json_fields",
            Self::Reachable => "reachable",
        }
    }
}

/// How network-level failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSeverity {
    /// Failures abort the scenario.
    Fatal,
    /// Network failures are tolerated and logged.
    Advisory,
}

/// Successful probe result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Endpoint answered as expected.
    Verified {
        /// HTTP status received.
        status: u16,
    },
    /// Network failure tolerated by an advisory expectation.
    Tolerated {
        /// Why the failure was tolerated.
        reason: String,
    },
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Live endpoint probe.
pub trait EndpointProbe: Send + Sync {
    /// Issues one GET to `url` and judges the response.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the endpoint fails the expectation.
    fn probe(&self, url: &str, expected: &ExpectationSet) -> Result<ProbeOutcome, ProbeError>;
}

// ============================================================================
// SECTION: Document Checks
// ============================================================================

/// Checks a parsed discovery document.
///
/// # Errors
///
/// Returns [`ProbeError`] naming the first unmet expectation.
pub fn check_discovery_document(
    url: &str,
    document: &Value,
    expected: &DiscoveryExpectations,
) -> Result<(), ProbeError> {
    let fields = as_object(url, document)?;
    for key in &expected.required_keys {
        if !fields.contains_key(key) {
            return Err(ProbeError::MissingKey {
                url: url.to_string(),
                key: key.clone(),
            });
        }
    }
    require_array_values(url, document, "response_types_supported", &expected.response_types)?;
    require_array_values(url, document, "scopes_supported", &expected.scopes)?;
    if let Some(fragment) = &expected.issuer_fragment {
        let issuer = document.get("issuer").and_then(Value::as_str).unwrap_or_default();
        if !issuer.contains(fragment.as_str()) {
            return Err(ProbeError::MissingValue {
                url: url.to_string(),
                field: "issuer".to_string(),
                expected: fragment.clone(),
            });
        }
    }
    Ok(())
}

/// Checks that listed fields of a JSON object equal the expected values.
///
/// # Errors
///
/// Returns [`ProbeError`] for the first absent or differing field.
pub fn check_json_fields(
    url: &str,
    document: &Value,
    expected: &BTreeMap<String, Value>,
) -> Result<(), ProbeError> {
    let fields = as_object(url, document)?;
    for (field, value) in expected {
        let actual = fields.get(field).ok_or_else(|| ProbeError::MissingKey {
            url: url.to_string(),
            key: field.clone(),
        })?;
        if actual != value {
            return Err(ProbeError::FieldMismatch {
                url: url.to_string(),
                field: field.clone(),
                actual: actual.to_string(),
                expected: value.to_string(),
            });
        }
    }
    Ok(())
}

fn as_object<'a>(
    url: &str,
    document: &'a Value,
) -> Result<&'a serde_json::Map<String, Value>, ProbeError> {
    document.as_object().ok_or_else(|| ProbeError::Body {
        url: url.to_string(),
        message: "expected a JSON object".to_string(),
    })
}

fn require_array_values(
    url: &str,
    document: &Value,
    field: &str,
    required: &[String],
) -> Result<(), ProbeError> {
    if required.is_empty() {
        return Ok(());
    }
    let values = document.get(field).and_then(Value::as_array);
    for expected in required {
        let present = values
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(expected.as_str())));
        if !present {
            return Err(ProbeError::MissingValue {
                url: url.to_string(),
                field: field.to_string(),
                expected: expected.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod probe_tests;
