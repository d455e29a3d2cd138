// crates/iam-harness-core/src/lifecycle.rs
// ============================================================================
// Module: Scenario Lifecycle
// Description: Scenario state machine and the teardown guard.
// Purpose: Guarantee that every provisioned scenario is destroyed exactly once.
// Dependencies: crate::{config, engine, events, outputs}
// ============================================================================

//! ## Overview
//! Scenarios move `Unconfigured -> Provisioning -> {Ready, Failed}` and leave
//! only through teardown into `TornDown`. [`ActiveScenario`] is registered
//! before the engine creates anything; it owns the destroy call and runs it
//! from [`Drop`] when the caller never tears down explicitly, including while
//! unwinding from a panic.
//! Invariants:
//! - Destroy is called at most once per registered scenario.
//! - Outputs are readable only in the `Ready` state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::ScenarioConfig;
use crate::engine::ProvisioningEngine;
use crate::error::StateError;
use crate::error::TeardownError;
use crate::events::EventOutcome;
use crate::events::ScenarioEvent;
use crate::events::ScenarioLogSink;
use crate::outputs::OutputSet;

// ============================================================================
// SECTION: States
// ============================================================================

/// Scenario lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    /// Configuration built, nothing registered.
    Unconfigured,
    /// Teardown registered, engine running.
    Provisioning,
    /// Resources created and outputs available.
    Ready,
    /// Provisioning failed.
    Failed,
    /// Teardown completed.
    TornDown,
}

impl ScenarioState {
    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Provisioning => "provisioning",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::TornDown => "torn_down",
        }
    }

    /// Returns true when `self -> to` is a legal transition.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Unconfigured, Self::Provisioning)
                | (Self::Provisioning, Self::Ready | Self::Failed)
                | (Self::Ready | Self::Failed, Self::TornDown)
        )
    }

    /// Performs a transition.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the transition is illegal.
    pub const fn transition(self, to: Self) -> Result<Self, StateError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(StateError {
                from: self,
                to,
            })
        }
    }
}

impl fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Active Scenario
// ============================================================================

/// Registered scenario that owns its teardown.
///
/// # Invariants
/// - `destroy_attempted` flips to true before the engine destroy call returns,
///   so neither [`Self::teardown`] nor [`Drop`] can call it twice.
pub struct ActiveScenario<'a, E: ProvisioningEngine> {
    /// Engine that created the resources.
    engine: &'a E,
    /// Configuration passed to every engine call.
    config: &'a ScenarioConfig,
    /// Event sink.
    sink: Arc<dyn ScenarioLogSink>,
    /// Current lifecycle state.
    state: ScenarioState,
    /// Outputs, present once `Ready`.
    outputs: Option<OutputSet>,
    /// Whether the destroy call has been made.
    destroy_attempted: bool,
}

impl<'a, E: ProvisioningEngine> ActiveScenario<'a, E> {
    /// Registers teardown for a scenario about to be provisioned.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] only if the initial transition is rejected.
    pub fn register(
        engine: &'a E,
        config: &'a ScenarioConfig,
        sink: Arc<dyn ScenarioLogSink>,
    ) -> Result<Self, StateError> {
        let mut scenario = Self {
            engine,
            config,
            sink,
            state: ScenarioState::Unconfigured,
            outputs: None,
            destroy_attempted: false,
        };
        scenario.advance(ScenarioState::Provisioning)?;
        Ok(scenario)
    }

    /// Records successful provisioning.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] unless the scenario is `Provisioning`.
    pub fn mark_ready(&mut self, outputs: OutputSet) -> Result<(), StateError> {
        self.advance(ScenarioState::Ready)?;
        self.outputs = Some(outputs);
        Ok(())
    }

    /// Records failed provisioning.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] unless the scenario is `Provisioning`.
    pub fn mark_failed(&mut self) -> Result<(), StateError> {
        self.advance(ScenarioState::Failed)
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ScenarioState {
        self.state
    }

    /// Returns the scenario configuration.
    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        self.config
    }

    /// Returns the engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        self.engine
    }

    /// Returns the outputs of a `Ready` scenario.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the scenario is not `Ready`.
    pub fn outputs(&self) -> Result<&OutputSet, StateError> {
        match (&self.outputs, self.state) {
            (Some(outputs), ScenarioState::Ready) => Ok(outputs),
            _ => Err(StateError {
                from: self.state,
                to: ScenarioState::Ready,
            }),
        }
    }

    /// Destroys the scenario resources now.
    ///
    /// # Errors
    ///
    /// Returns [`TeardownError`] when the engine destroy call fails.
    pub fn teardown(mut self) -> Result<(), TeardownError> {
        self.destroy_once()
    }

    fn advance(&mut self, to: ScenarioState) -> Result<(), StateError> {
        self.state = self.state.transition(to)?;
        self.sink.record(&ScenarioEvent::transition(self.config.name(), to));
        Ok(())
    }

    fn destroy_once(&mut self) -> Result<(), TeardownError> {
        if self.destroy_attempted {
            return Ok(());
        }
        self.destroy_attempted = true;
        if self.state == ScenarioState::Provisioning {
            // Interrupted mid-provisioning, typically by a panic.
            let _ = self.advance(ScenarioState::Failed);
        }
        let config = self.config;
        let name = config.name();
        match self.engine.destroy(config) {
            Ok(()) => {
                self.sink.record(&ScenarioEvent::teardown(name, EventOutcome::Ok, None));
                let _ = self.advance(ScenarioState::TornDown);
                Ok(())
            }
            Err(err) => {
                self.sink.record(&ScenarioEvent::teardown(
                    name,
                    EventOutcome::Error,
                    Some(err.message.clone()),
                ));
                Err(TeardownError {
                    scenario: name.to_string(),
                    message: err.message,
                })
            }
        }
    }
}

impl<E: ProvisioningEngine> Drop for ActiveScenario<'_, E> {
    fn drop(&mut self) {
        let _ = self.destroy_once();
    }
}

impl<E: ProvisioningEngine> fmt::Debug for ActiveScenario<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveScenario")
            .field("scenario", &self.config.name())
            .field("state", &self.state)
            .field("destroy_attempted", &self.destroy_attempted)
            .finish_non_exhaustive()
    }
}
