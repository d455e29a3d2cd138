// crates/iam-harness-providers/src/terraform.rs
// ============================================================================
// Module: Terraform Engine
// Description: Provisioning engine backed by the Terraform CLI.
// Purpose: Run init/plan/apply/output/destroy for a scenario stack.
// Dependencies: iam-harness-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! [`TerraformEngine`] shells out to the `terraform` binary in
//! `<stack_root>/<stack_location>`. Variables are written to a temporary JSON
//! var file per call so list and map values keep their types. Failures carry
//! the combined stdout and stderr of the command, unmodified, so callers can
//! match validation messages by substring.
//! Invariants:
//! - Every command runs with `-no-color`, and every command that can prompt
//!   runs with `-input=false`.
//! - With a state root configured, each scenario gets its own data directory
//!   and state file, so scenarios sharing a stack never share state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use iam_harness_core::EngineError;
use iam_harness_core::EngineStep;
use iam_harness_core::OutputError;
use iam_harness_core::OutputSet;
use iam_harness_core::OutputValue;
use iam_harness_core::ProvisioningEngine;
use iam_harness_core::ScenarioConfig;
use serde_json::Value;
use tempfile::NamedTempFile;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default Terraform binary name.
pub const DEFAULT_TERRAFORM_BIN: &str = "terraform";

/// Terraform engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformConfig {
    /// Terraform binary, resolved through `PATH` when relative.
    pub binary: PathBuf,
    /// Directory stack locations are resolved against.
    pub stack_root: PathBuf,
    /// Root for per-scenario data directories and state files.
    pub state_root: Option<PathBuf>,
}

impl TerraformConfig {
    /// Uses the default binary and the given stack root.
    #[must_use]
    pub fn new(stack_root: impl Into<PathBuf>) -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_TERRAFORM_BIN),
            stack_root: stack_root.into(),
            state_root: None,
        }
    }

    /// Replaces the Terraform binary.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Isolates scenario state under `state_root`.
    #[must_use]
    pub fn with_state_root(mut self, state_root: impl Into<PathBuf>) -> Self {
        self.state_root = Some(state_root.into());
        self
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Provisioning engine that drives the Terraform CLI.
#[derive(Debug, Clone)]
pub struct TerraformEngine {
    /// Engine configuration.
    config: TerraformConfig,
}

impl TerraformEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new(config: TerraformConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &TerraformConfig {
        &self.config
    }

    /// Returns the directory Terraform runs in for a scenario.
    #[must_use]
    pub fn working_dir(&self, scenario: &ScenarioConfig) -> PathBuf {
        self.config.stack_root.join(scenario.stack_location())
    }

    fn scenario_state_dir(&self, scenario: &ScenarioConfig) -> Option<PathBuf> {
        self.config.state_root.as_ref().map(|root| root.join(sanitize(scenario.name())))
    }

    fn run(
        &self,
        scenario: &ScenarioConfig,
        step: EngineStep,
        args: &[&str],
        with_variables: bool,
    ) -> Result<String, EngineError> {
        let mut command = Command::new(&self.config.binary);
        command.args(args);
        if step != EngineStep::Output {
            command.arg("-input=false");
        }
        command.arg("-no-color");
        command.current_dir(self.working_dir(scenario));
        command.envs(scenario.environment_overrides());

        if let Some(state_dir) = self.scenario_state_dir(scenario) {
            std::fs::create_dir_all(&state_dir).map_err(|err| {
                EngineError::new(step, format!("failed to create {}: {err}", state_dir.display()))
            })?;
            command.env("TF_DATA_DIR", state_dir.join(".terraform"));
            if step != EngineStep::Init {
                command.arg(format!("-state={}", state_dir.join("terraform.tfstate").display()));
            }
        }

        // Kept alive until the command exits.
        let var_file = if with_variables && !scenario.variables().is_empty() {
            let file = write_var_file(scenario, step)?;
            command.arg(format!("-var-file={}", file.path().display()));
            Some(file)
        } else {
            None
        };

        let output = command.output().map_err(|err| {
            EngineError::new(
                step,
                format!("failed to run {}: {err}", self.config.binary.display()),
            )
        })?;
        drop(var_file);

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(EngineError::new(step, combine_output(&stdout, &stderr)))
    }
}

impl ProvisioningEngine for TerraformEngine {
    fn init(&self, config: &ScenarioConfig) -> Result<(), EngineError> {
        self.run(config, EngineStep::Init, &["init"], false).map(|_| ())
    }

    fn plan(&self, config: &ScenarioConfig) -> Result<(), EngineError> {
        self.run(config, EngineStep::Plan, &["plan", "-lock=false"], true).map(|_| ())
    }

    fn apply(&self, config: &ScenarioConfig) -> Result<(), EngineError> {
        self.run(config, EngineStep::Apply, &["apply", "-auto-approve", "-lock=false"], true)
            .map(|_| ())
    }

    fn outputs(&self, config: &ScenarioConfig) -> Result<OutputSet, EngineError> {
        let stdout = self.run(config, EngineStep::Output, &["output", "-json"], false)?;
        parse_output_json(&stdout)
            .map_err(|err| EngineError::new(EngineStep::Output, err.to_string()))
    }

    fn destroy(&self, config: &ScenarioConfig) -> Result<(), EngineError> {
        self.run(config, EngineStep::Destroy, &["destroy", "-auto-approve", "-lock=false"], true)
            .map(|_| ())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses `terraform output -json` into an output set.
///
/// Each entry is an object whose `value` field carries the output; strings
/// stay strings, objects become string maps, other values are rendered as
/// JSON text.
///
/// # Errors
///
/// Returns [`OutputError::Parse`] when the payload is not the expected shape.
pub fn parse_output_json(payload: &str) -> Result<OutputSet, OutputError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(OutputSet::new());
    }
    let document: Value =
        serde_json::from_str(trimmed).map_err(|err| OutputError::Parse(err.to_string()))?;
    let Value::Object(entries) = document else {
        return Err(OutputError::Parse("expected a JSON object of outputs".to_string()));
    };
    entries
        .into_iter()
        .map(|(name, entry)| {
            let value = entry
                .get("value")
                .ok_or_else(|| OutputError::Parse(format!("output `{name}` has no value")))?;
            Ok((name, OutputValue::from_json(value)))
        })
        .collect()
}

fn write_var_file(
    scenario: &ScenarioConfig,
    step: EngineStep,
) -> Result<NamedTempFile, EngineError> {
    let io_error =
        |err: std::io::Error| EngineError::new(step, format!("failed to write var file: {err}"));
    let mut file = tempfile::Builder::new().suffix(".tfvars.json").tempfile().map_err(io_error)?;
    let payload = serde_json::to_vec(scenario.variables())
        .map_err(|err| EngineError::new(step, format!("failed to encode variables: {err}")))?;
    file.write_all(&payload).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    Ok(file)
}

fn combine_output(stdout: &str, stderr: &str) -> String {
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (true, true) => "terraform exited with a failure status and no output".to_string(),
        (false, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Returns true when `path` looks like a Terraform stack directory.
#[must_use]
pub fn is_stack_dir(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok_and(|entries| {
        entries.filter_map(Result::ok).any(|entry| {
            entry.path().extension().is_some_and(|ext| ext == "tf")
        })
    })
}
