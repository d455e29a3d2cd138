// crates/iam-harness-core/src/lib.rs
// ============================================================================
// Module: IAM Harness Core Library
// Description: Public API surface for the scenario harness core.
// Purpose: Expose scenario configuration, outputs, validators, and the runner.
// Dependencies: rand, regex, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The harness core drives identity-infrastructure scenarios through a fixed
//! sequence: build a [`ScenarioConfig`], register teardown, provision through a
//! [`ProvisioningEngine`], read back an [`OutputSet`], and run [`Validator`]s
//! against it. It is engine-agnostic: the Terraform CLI and the HTTP endpoint
//! probe live in `iam-harness-providers`.
//! Invariants:
//! - Teardown runs exactly once for every scenario that entered provisioning.
//! - Validation fails fast on the first failing validator.
//! - Missing outputs are hard failures, never silent defaults.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod naming;
pub mod outputs;
pub mod probe;
pub mod runner;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::RetryPolicy;
pub use config::RetryableError;
pub use config::ScenarioConfig;
pub use config::ScenarioConfigBuilder;
pub use engine::EngineError;
pub use engine::EngineStep;
pub use engine::ProvisioningEngine;
pub use error::AssertionFailure;
pub use error::CheckFailure;
pub use error::ConfigError;
pub use error::OutputError;
pub use error::ProbeError;
pub use error::ProvisionError;
pub use error::ScenarioError;
pub use error::ScenarioFailure;
pub use error::StateError;
pub use error::TeardownError;
pub use error::ValidationError;
pub use events::EventOutcome;
pub use events::FileLogSink;
pub use events::MemoryLogSink;
pub use events::NoopLogSink;
pub use events::ScenarioEvent;
pub use events::ScenarioLogSink;
pub use events::StderrLogSink;
pub use lifecycle::ActiveScenario;
pub use lifecycle::ScenarioState;
pub use naming::unique_id;
pub use outputs::OutputSet;
pub use outputs::OutputValue;
pub use probe::DEFAULT_PROBE_TIMEOUT;
pub use probe::DiscoveryExpectations;
pub use probe::EndpointProbe;
pub use probe::ExpectationSet;
pub use probe::ProbeOutcome;
pub use probe::ProbeSeverity;
pub use runner::ScenarioRunner;
pub use validator::Check;
pub use validator::CheckOutcome;
pub use validator::CustomCheck;
pub use validator::OutputRef;
pub use validator::Validator;
