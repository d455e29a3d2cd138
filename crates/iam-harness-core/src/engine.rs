// crates/iam-harness-core/src/engine.rs
// ============================================================================
// Module: Provisioning Engine Interface
// Description: Boundary between the harness and the infrastructure-as-code tool.
// Purpose: Keep the runner independent of any particular engine binary.
// Dependencies: crate::{config, outputs}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ProvisioningEngine`] executes the plan/apply/destroy lifecycle of an
//! external infrastructure-as-code tool for one [`ScenarioConfig`]. Engines
//! report failures as human-readable text; the runner classifies that text
//! for retries and callers match it by substring.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::ScenarioConfig;
use crate::outputs::OutputSet;

// ============================================================================
// SECTION: Steps
// ============================================================================

/// Engine lifecycle step.
///
/// # Invariants
/// - Variants are stable for event labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStep {
    /// Working-directory initialization.
    Init,
    /// Dry-run planning.
    Plan,
    /// Resource creation.
    Apply,
    /// Output retrieval.
    Output,
    /// Resource destruction.
    Destroy,
}

impl EngineStep {
    /// Returns a stable label for the step.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Plan => "plan",
            Self::Apply => "apply",
            Self::Output => "output",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for EngineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure reported by an engine step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step} failed: {message}")]
pub struct EngineError {
    /// Step that failed.
    pub step: EngineStep,
    /// Engine diagnostic text (stdout and stderr as reported).
    pub message: String,
}

impl EngineError {
    /// Creates a new engine error.
    #[must_use]
    pub fn new(step: EngineStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Infrastructure-as-code engine driven by the scenario runner.
///
/// Implementations must be safe to call from many scenarios at once; each call
/// receives everything it needs through the [`ScenarioConfig`].
pub trait ProvisioningEngine: Send + Sync {
    /// Prepares the stack working directory.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when initialization fails.
    fn init(&self, config: &ScenarioConfig) -> Result<(), EngineError>;

    /// Plans the stack without creating resources.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the configuration is rejected.
    fn plan(&self, config: &ScenarioConfig) -> Result<(), EngineError>;

    /// Creates the stack resources.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when creation fails.
    fn apply(&self, config: &ScenarioConfig) -> Result<(), EngineError>;

    /// Reads the stack outputs after a successful apply.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when outputs cannot be read or parsed.
    fn outputs(&self, config: &ScenarioConfig) -> Result<OutputSet, EngineError>;

    /// Destroys every resource the stack created.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when destruction fails.
    fn destroy(&self, config: &ScenarioConfig) -> Result<(), EngineError>;
}
