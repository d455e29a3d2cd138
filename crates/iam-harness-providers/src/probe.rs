// crates/iam-harness-providers/src/probe.rs
// ============================================================================
// Module: HTTP Endpoint Probe
// Description: Blocking HTTP probe for identity-provider endpoints.
// Purpose: Judge discovery, metadata, redirect, and reachability responses.
// Dependencies: iam-harness-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! [`HttpEndpointProbe`] issues one bounded GET per call. Two clients are kept:
//! one follows redirects for document fetches and one never follows them for
//! redirect expectations, where the redirect itself is the signal.
//! Invariants:
//! - Every request is bounded by the configured timeout.
//! - Network failures are tolerated only for advisory expectations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use iam_harness_core::DEFAULT_PROBE_TIMEOUT;
use iam_harness_core::EndpointProbe;
use iam_harness_core::ExpectationSet;
use iam_harness_core::ProbeError;
use iam_harness_core::ProbeOutcome;
use iam_harness_core::probe::check_discovery_document;
use iam_harness_core::probe::check_json_fields;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP client construction failure.
#[derive(Debug, Error)]
#[error("http probe client could not be built: {0}")]
pub struct ProbeSetupError(String);

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Blocking HTTP implementation of [`EndpointProbe`].
#[derive(Debug, Clone)]
pub struct HttpEndpointProbe {
    /// Client that follows redirects.
    follow: Client,
    /// Client that never follows redirects.
    no_redirect: Client,
    /// Per-request timeout.
    timeout: Duration,
}

impl HttpEndpointProbe {
    /// Creates a probe with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeSetupError`] when an HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ProbeSetupError> {
        Ok(Self {
            follow: build_client(timeout, Policy::limited(10))?,
            no_redirect: build_client(timeout, Policy::none())?,
            timeout,
        })
    }

    /// Creates a probe with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeSetupError`] when an HTTP client cannot be built.
    pub fn with_default_timeout() -> Result<Self, ProbeSetupError> {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn get(&self, client: &Client, url: &Url) -> Result<Response, ProbeError> {
        client.get(url.as_str()).send().map_err(|err| self.transport_error(url, &err))
    }

    fn transport_error(&self, url: &Url, err: &reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout.as_millis(),
            }
        } else {
            ProbeError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    fn tolerate(&self, client: &Client, url: &Url) -> Result<Result<u16, String>, ProbeError> {
        match self.get(client, url) {
            Ok(response) => Ok(Ok(response.status().as_u16())),
            Err(err @ (ProbeError::Timeout { .. } | ProbeError::Transport { .. })) => {
                Ok(Err(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

impl EndpointProbe for HttpEndpointProbe {
    fn probe(&self, url: &str, expected: &ExpectationSet) -> Result<ProbeOutcome, ProbeError> {
        let parsed = Url::parse(url).map_err(|err| ProbeError::InvalidUrl {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        match expected {
            ExpectationSet::Redirect => match self.tolerate(&self.no_redirect, &parsed)? {
                Ok(status) if status >= 300 => Ok(ProbeOutcome::Verified {
                    status,
                }),
                Ok(status) => Err(ProbeError::Status {
                    url: url.to_string(),
                    status,
                    expected: "a redirect or error status (>= 300)".to_string(),
                }),
                Err(reason) => Ok(ProbeOutcome::Tolerated {
                    reason,
                }),
            },
            ExpectationSet::Reachable => match self.tolerate(&self.follow, &parsed)? {
                Ok(status) => Ok(ProbeOutcome::Verified {
                    status,
                }),
                Err(reason) => Ok(ProbeOutcome::Tolerated {
                    reason,
                }),
            },
            ExpectationSet::Discovery(expectations) => {
                let response = self.get(&self.follow, &parsed)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ProbeError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                        expected: "2xx".to_string(),
                    });
                }
                let document = read_json(url, response)?;
                check_discovery_document(url, &document, expectations)?;
                Ok(ProbeOutcome::Verified {
                    status: status.as_u16(),
                })
            }
            ExpectationSet::Metadata {
                content_type_fragment,
            } => {
                let response = self.get(&self.follow, &parsed)?;
                let status = require_ok(url, &response)?;
                let content_type = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default();
                if !content_type.contains(content_type_fragment.as_str()) {
                    return Err(ProbeError::ContentType {
                        url: url.to_string(),
                        actual: content_type.to_string(),
                        expected: content_type_fragment.clone(),
                    });
                }
                Ok(ProbeOutcome::Verified {
                    status,
                })
            }
            ExpectationSet::JsonFields(fields) => {
                let response = self.get(&self.follow, &parsed)?;
                let status = require_ok(url, &response)?;
                let document = read_json(url, response)?;
                check_json_fields(url, &document, fields)?;
                Ok(ProbeOutcome::Verified {
                    status,
                })
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn build_client(timeout: Duration, redirect: Policy) -> Result<Client, ProbeSetupError> {
    Client::builder()
        .timeout(timeout)
        .redirect(redirect)
        .user_agent(concat!("iam-harness/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| ProbeSetupError(err.to_string()))
}

fn require_ok(url: &str, response: &Response) -> Result<u16, ProbeError> {
    let status = response.status().as_u16();
    if status == 200 {
        Ok(status)
    } else {
        Err(ProbeError::Status {
            url: url.to_string(),
            status,
            expected: "200".to_string(),
        })
    }
}

fn read_json(url: &str, response: Response) -> Result<Value, ProbeError> {
    response.json::<Value>().map_err(|err| ProbeError::Body {
        url: url.to_string(),
        message: err.to_string(),
    })
}
