// crates/iam-harness-core/src/events.rs
// ============================================================================
// Module: Scenario Events
// Description: Structured JSON-line events for scenario runs.
// Purpose: Record lifecycle, engine, validator, and teardown activity.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every observable step of a scenario is emitted as a [`ScenarioEvent`]
//! through a [`ScenarioLogSink`]. Sinks are lightweight so test binaries can
//! route events to stderr, a per-run file, or memory for assertions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::engine::EngineStep;
use crate::lifecycle::ScenarioState;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// Step completed.
    Ok,
    /// Step failed transiently and will be reattempted.
    Retry,
    /// Failure was tolerated by the expectation class.
    Tolerated,
    /// Step failed.
    Error,
}

/// Scenario event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Scenario name.
    pub scenario: String,
    /// Lifecycle state after the event, when it changed.
    pub state: Option<ScenarioState>,
    /// Engine step, for engine events.
    pub step: Option<EngineStep>,
    /// Attempt number, for engine events.
    pub attempt: Option<u32>,
    /// Validator name, for validator events.
    pub validator: Option<String>,
    /// Event outcome.
    pub outcome: EventOutcome,
    /// Diagnostic text.
    pub message: Option<String>,
}

impl ScenarioEvent {
    fn base(event: &'static str, scenario: &str, outcome: EventOutcome) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            scenario: scenario.to_string(),
            state: None,
            step: None,
            attempt: None,
            validator: None,
            outcome,
            message: None,
        }
    }

    /// Creates a lifecycle transition event.
    #[must_use]
    pub fn transition(scenario: &str, state: ScenarioState) -> Self {
        let outcome = match state {
            ScenarioState::Failed => EventOutcome::Error,
            _ => EventOutcome::Ok,
        };
        Self {
            state: Some(state),
            ..Self::base("scenario_transition", scenario, outcome)
        }
    }

    /// Creates an engine step event.
    #[must_use]
    pub fn engine_step(
        scenario: &str,
        step: EngineStep,
        attempt: u32,
        outcome: EventOutcome,
        message: Option<String>,
    ) -> Self {
        Self {
            step: Some(step),
            attempt: Some(attempt),
            message,
            ..Self::base("engine_step", scenario, outcome)
        }
    }

    /// Creates a validator outcome event.
    #[must_use]
    pub fn validator(
        scenario: &str,
        validator: &str,
        outcome: EventOutcome,
        message: Option<String>,
    ) -> Self {
        Self {
            validator: Some(validator.to_string()),
            message,
            ..Self::base("validator", scenario, outcome)
        }
    }

    /// Creates a teardown result event.
    #[must_use]
    pub fn teardown(scenario: &str, outcome: EventOutcome, message: Option<String>) -> Self {
        Self {
            step: Some(EngineStep::Destroy),
            message,
            ..Self::base("teardown", scenario, outcome)
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink for scenario events.
pub trait ScenarioLogSink: Send + Sync {
    /// Record a scenario event.
    fn record(&self, event: &ScenarioEvent);
}

/// Sink that logs JSON lines to stderr.
pub struct StderrLogSink;

impl ScenarioLogSink for StderrLogSink {
    fn record(&self, event: &ScenarioEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that logs JSON lines to a file.
pub struct FileLogSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileLogSink {
    /// Opens the event log in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ScenarioLogSink for FileLogSink {
    fn record(&self, event: &ScenarioEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
        }
    }
}

/// No-op sink.
pub struct NoopLogSink;

impl ScenarioLogSink for NoopLogSink {
    fn record(&self, _event: &ScenarioEvent) {}
}

/// Sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryLogSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<ScenarioEvent>>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ScenarioEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ScenarioLogSink for MemoryLogSink {
    fn record(&self, event: &ScenarioEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
