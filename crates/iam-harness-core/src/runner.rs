// crates/iam-harness-core/src/runner.rs
// ============================================================================
// Module: Scenario Runner
// Description: Build, provision, validate, and tear down one scenario.
// Purpose: Implement the shared scenario sequence once for every provider.
// Dependencies: crate::{config, engine, error, events, lifecycle, probe, validator}
// ============================================================================

//! ## Overview
//! [`ScenarioRunner`] registers teardown, drives the engine with the
//! scenario's retry policy, and runs validators fail-fast against the
//! resulting outputs. It holds no per-scenario state and can be shared by
//! concurrently running tests.
//! Invariants:
//! - Teardown is registered before the first engine call that can create
//!   resources and runs exactly once.
//! - A teardown failure never replaces an earlier primary failure.
//! - [`ScenarioRunner::plan_only`] never applies or destroys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::thread;

use crate::config::ScenarioConfig;
use crate::engine::EngineError;
use crate::engine::EngineStep;
use crate::engine::ProvisioningEngine;
use crate::error::AssertionFailure;
use crate::error::CheckFailure;
use crate::error::ProvisionError;
use crate::error::ScenarioError;
use crate::error::ScenarioFailure;
use crate::error::TeardownError;
use crate::error::ValidationError;
use crate::events::EventOutcome;
use crate::events::NoopLogSink;
use crate::events::ScenarioEvent;
use crate::events::ScenarioLogSink;
use crate::lifecycle::ActiveScenario;
use crate::outputs::OutputSet;
use crate::probe::EndpointProbe;
use crate::validator::CheckOutcome;
use crate::validator::Validator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Validator name reported when a negative plan check fails.
pub const PLAN_ONLY_VALIDATOR: &str = "plan_only";

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Drives scenarios through a provisioning engine.
pub struct ScenarioRunner<E: ProvisioningEngine> {
    /// Provisioning engine.
    engine: E,
    /// Endpoint probe for probe-backed validators.
    probe: Option<Arc<dyn EndpointProbe>>,
    /// Event sink.
    sink: Arc<dyn ScenarioLogSink>,
}

impl<E: ProvisioningEngine> ScenarioRunner<E> {
    /// Creates a runner with no probe and a no-op event sink.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            probe: None,
            sink: Arc::new(NoopLogSink),
        }
    }

    /// Attaches an endpoint probe.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn EndpointProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ScenarioLogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the endpoint probe, if any.
    #[must_use]
    pub fn probe(&self) -> Option<&dyn EndpointProbe> {
        self.probe.as_deref()
    }

    /// Provisions, validates, and tears down a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioFailure`] carrying the first failure and any
    /// teardown failure observed afterwards.
    pub fn run(
        &self,
        config: &ScenarioConfig,
        validators: &[Validator],
    ) -> Result<OutputSet, ScenarioFailure> {
        let active = self.provision(config)?;
        let outcome = active.outputs().map_err(ScenarioError::from).and_then(|outputs| {
            self.validate(config, outputs, validators)?;
            Ok(outputs.clone())
        });
        let teardown = active.teardown();
        finish(outcome, teardown)
    }

    /// Registers teardown and provisions a scenario.
    ///
    /// The returned scenario is `Ready`; dropping it destroys the resources.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioFailure`] when provisioning fails. Teardown has
    /// already run in that case and its failure, if any, is attached.
    pub fn provision<'a>(
        &'a self,
        config: &'a ScenarioConfig,
    ) -> Result<ActiveScenario<'a, E>, ScenarioFailure> {
        let mut active = ActiveScenario::register(&self.engine, config, Arc::clone(&self.sink))?;
        match self.create(config) {
            Ok(outputs) => {
                active.mark_ready(outputs)?;
                Ok(active)
            }
            Err(error) => {
                active.mark_failed()?;
                Err(ScenarioFailure {
                    error,
                    teardown: active.teardown().err(),
                })
            }
        }
    }

    /// Initializes and plans a scenario without creating resources.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioFailure`] with a [`ProvisionError`] when
    /// initialization fails or a [`ValidationError`] when the plan is
    /// rejected.
    pub fn plan(&self, config: &ScenarioConfig) -> Result<(), ScenarioFailure> {
        self.with_retry(config, EngineStep::Init, || self.engine.init(config))
            .map_err(ScenarioError::from)?;
        match self.engine.plan(config) {
            Ok(()) => {
                self.record_step(config, EngineStep::Plan, 1, EventOutcome::Ok, None);
                Ok(())
            }
            Err(err) => {
                self.record_step(
                    config,
                    EngineStep::Plan,
                    1,
                    EventOutcome::Error,
                    Some(err.message.clone()),
                );
                Err(ScenarioError::from(ValidationError {
                    message: err.message,
                })
                .into())
            }
        }
    }

    /// Expects the plan to be rejected with a message containing `required`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioFailure`] with an [`AssertionFailure`] when the plan
    /// succeeds or is rejected for a different reason, and propagates
    /// initialization failures.
    pub fn plan_only(
        &self,
        config: &ScenarioConfig,
        required: &str,
    ) -> Result<ValidationError, ScenarioFailure> {
        let rejection = match self.plan(config) {
            Ok(()) => {
                return Err(AssertionFailure {
                    validator: PLAN_ONLY_VALIDATOR.to_string(),
                    cause: CheckFailure::mismatch("plan succeeded", required),
                }
                .into());
            }
            Err(ScenarioFailure {
                error: ScenarioError::Validation(rejection),
                ..
            }) => rejection,
            Err(other) => return Err(other),
        };
        if rejection.contains(required) {
            return Ok(rejection);
        }
        Err(AssertionFailure {
            validator: PLAN_ONLY_VALIDATOR.to_string(),
            cause: CheckFailure::mismatch(
                format!("plan was rejected for another reason: {}", rejection.message),
                required,
            ),
        }
        .into())
    }

    /// Runs validators in order and stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Assertion`] for the first failing validator.
    pub fn validate(
        &self,
        config: &ScenarioConfig,
        outputs: &OutputSet,
        validators: &[Validator],
    ) -> Result<(), ScenarioError> {
        for validator in validators {
            match validator.validate(outputs, self.probe()) {
                Ok(CheckOutcome::Passed) => self.sink.record(&ScenarioEvent::validator(
                    config.name(),
                    validator.name(),
                    EventOutcome::Ok,
                    None,
                )),
                Ok(CheckOutcome::Tolerated(reason)) => self.sink.record(&ScenarioEvent::validator(
                    config.name(),
                    validator.name(),
                    EventOutcome::Tolerated,
                    Some(reason),
                )),
                Err(cause) => {
                    self.sink.record(&ScenarioEvent::validator(
                        config.name(),
                        validator.name(),
                        EventOutcome::Error,
                        Some(cause.to_string()),
                    ));
                    return Err(AssertionFailure {
                        validator: validator.name().to_string(),
                        cause,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn create(&self, config: &ScenarioConfig) -> Result<OutputSet, ScenarioError> {
        self.with_retry(config, EngineStep::Init, || self.engine.init(config))?;
        self.with_retry(config, EngineStep::Apply, || self.engine.apply(config))?;
        let outputs = self.engine.outputs(config).map_err(|err| ProvisionError {
            step: EngineStep::Output,
            attempts: 1,
            message: err.message,
        })?;
        if outputs.is_empty() {
            return Err(ProvisionError {
                step: EngineStep::Output,
                attempts: 1,
                message: "engine reported no outputs".to_string(),
            }
            .into());
        }
        self.record_step(config, EngineStep::Output, 1, EventOutcome::Ok, None);
        Ok(outputs)
    }

    fn with_retry<F>(
        &self,
        config: &ScenarioConfig,
        step: EngineStep,
        mut op: F,
    ) -> Result<(), ProvisionError>
    where
        F: FnMut() -> Result<(), EngineError>,
    {
        let policy = config.retry_policy();
        let mut attempt = 1;
        loop {
            match op() {
                Ok(()) => {
                    self.record_step(config, step, attempt, EventOutcome::Ok, None);
                    return Ok(());
                }
                Err(err) => {
                    let transient = policy.classify(&err.message);
                    if let Some(matched) = transient
                        && attempt <= policy.max_attempts()
                    {
                        self.record_step(
                            config,
                            step,
                            attempt,
                            EventOutcome::Retry,
                            Some(matched.description().to_string()),
                        );
                        thread::sleep(policy.backoff_interval());
                        attempt += 1;
                        continue;
                    }
                    self.record_step(
                        config,
                        step,
                        attempt,
                        EventOutcome::Error,
                        Some(err.message.clone()),
                    );
                    return Err(ProvisionError {
                        step,
                        attempts: attempt,
                        message: err.message,
                    });
                }
            }
        }
    }

    fn record_step(
        &self,
        config: &ScenarioConfig,
        step: EngineStep,
        attempt: u32,
        outcome: EventOutcome,
        message: Option<String>,
    ) {
        let event = ScenarioEvent::engine_step(config.name(), step, attempt, outcome, message);
        self.sink.record(&event);
    }
}

fn finish(
    outcome: Result<OutputSet, ScenarioError>,
    teardown: Result<(), TeardownError>,
) -> Result<OutputSet, ScenarioFailure> {
    match (outcome, teardown) {
        (Ok(outputs), Ok(())) => Ok(outputs),
        (Ok(_), Err(teardown)) => Err(ScenarioError::Teardown(teardown).into()),
        (Err(error), teardown) => Err(ScenarioFailure {
            error,
            teardown: teardown.err(),
        }),
    }
}
