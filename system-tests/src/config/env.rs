// system-tests/src/config/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed settings for harness system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation and defaults.
// Dependencies: iam-harness-core, iam-harness-providers
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement. Provider
//! credentials treat a blank value like an unset one, so defaults and skips
//! still apply when CI injects a missing secret as an empty string. Blank
//! `IAM_HARNESS_*` values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use iam_harness_core::DEFAULT_PROBE_TIMEOUT;
use iam_harness_providers::DEFAULT_TERRAFORM_BIN;
use iam_harness_providers::providers::cognito;
use iam_harness_providers::providers::keycloak;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Default stack root, relative to the system-tests package directory.
const DEFAULT_STACK_ROOT: &str = "..";

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// AWS region for Cognito stacks.
    AwsRegion,
    /// Azure AD tenant; Azure suites skip when unset.
    AzureTenantId,
    /// Keycloak base URL.
    KeycloakUrl,
    /// Keycloak admin username.
    KeycloakUsername,
    /// Keycloak admin password.
    KeycloakPassword,
    /// Okta org name; Okta suites skip when unset.
    OktaOrgName,
    /// Okta API token; Okta suites skip when unset.
    OktaApiToken,
    /// Directory containing the Terraform stacks.
    StackRoot,
    /// Terraform binary path or name.
    TerraformBin,
    /// Optional run root override for artifacts and state.
    RunRoot,
    /// HTTP probe timeout in seconds (positive integer).
    ProbeTimeoutSeconds,
    /// Mirror scenario events to stderr (`true`/`false` or `1`/`0`).
    StderrEvents,
}

impl HarnessEnv {
    /// Every key, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::AwsRegion,
        Self::AzureTenantId,
        Self::KeycloakUrl,
        Self::KeycloakUsername,
        Self::KeycloakPassword,
        Self::OktaOrgName,
        Self::OktaApiToken,
        Self::StackRoot,
        Self::TerraformBin,
        Self::RunRoot,
        Self::ProbeTimeoutSeconds,
        Self::StderrEvents,
    ];

    /// Returns true for provider credentials shared with the Terraform stacks.
    #[must_use]
    pub const fn is_provider(self) -> bool {
        matches!(
            self,
            Self::AwsRegion
                | Self::AzureTenantId
                | Self::KeycloakUrl
                | Self::KeycloakUsername
                | Self::KeycloakPassword
                | Self::OktaOrgName
                | Self::OktaApiToken
        )
    }

    /// Variable name as read from the process environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwsRegion => cognito::AWS_REGION_ENV,
            Self::AzureTenantId => "ARM_TENANT_ID",
            Self::KeycloakUrl => "KEYCLOAK_URL",
            Self::KeycloakUsername => "KEYCLOAK_USERNAME",
            Self::KeycloakPassword => "KEYCLOAK_PASSWORD",
            Self::OktaOrgName => "OKTA_ORG_NAME",
            Self::OktaApiToken => "OKTA_API_TOKEN",
            Self::StackRoot => "IAM_HARNESS_STACK_ROOT",
            Self::TerraformBin => "IAM_HARNESS_TERRAFORM_BIN",
            Self::RunRoot => "IAM_HARNESS_RUN_ROOT",
            Self::ProbeTimeoutSeconds => "IAM_HARNESS_PROBE_TIMEOUT_SEC",
            Self::StderrEvents => "IAM_HARNESS_STDERR_EVENTS",
        }
    }
}

// ============================================================================
// SECTION: Settings Types
// ============================================================================

/// Keycloak admin connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeycloakSettings {
    /// Server base URL.
    pub url: String,
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

impl Default for KeycloakSettings {
    fn default() -> Self {
        Self {
            url: keycloak::DEFAULT_URL.to_string(),
            username: keycloak::DEFAULT_USERNAME.to_string(),
            password: keycloak::DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// Okta org credentials. Present only when both values are set.
#[derive(Clone, PartialEq, Eq)]
pub struct OktaSettings {
    /// Org name, e.g. `dev-123456`.
    pub org_name: String,
    /// API token.
    pub api_token: String,
}

impl fmt::Debug for OktaSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OktaSettings")
            .field("org_name", &self.org_name)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Typed harness settings derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessSettings {
    /// AWS region for Cognito stacks.
    pub aws_region: String,
    /// Azure AD tenant, if configured.
    pub azure_tenant_id: Option<String>,
    /// Keycloak admin connection.
    pub keycloak: KeycloakSettings,
    /// Okta credentials, if configured.
    pub okta: Option<OktaSettings>,
    /// Directory containing the Terraform stacks.
    pub stack_root: PathBuf,
    /// Terraform binary path or name.
    pub terraform_bin: PathBuf,
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Per-request HTTP probe timeout.
    pub probe_timeout: Duration,
    /// Mirror scenario events to stderr.
    pub stderr_events: bool,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            aws_region: cognito::DEFAULT_REGION.to_string(),
            azure_tenant_id: None,
            keycloak: KeycloakSettings::default(),
            okta: None,
            stack_root: PathBuf::from(DEFAULT_STACK_ROOT),
            terraform_bin: PathBuf::from(DEFAULT_TERRAFORM_BIN),
            run_root: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            stderr_events: false,
        }
    }
}

impl HarnessSettings {
    /// Loads settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout or boolean value).
    pub fn load() -> Result<Self, String> {
        let defaults = Self::default();
        let aws_region = read(HarnessEnv::AwsRegion)?.unwrap_or(defaults.aws_region);
        let azure_tenant_id = read(HarnessEnv::AzureTenantId)?;
        let keycloak = KeycloakSettings {
            url: read(HarnessEnv::KeycloakUrl)?.unwrap_or(defaults.keycloak.url),
            username: read(HarnessEnv::KeycloakUsername)?.unwrap_or(defaults.keycloak.username),
            password: read(HarnessEnv::KeycloakPassword)?.unwrap_or(defaults.keycloak.password),
        };
        let okta = match (read(HarnessEnv::OktaOrgName)?, read(HarnessEnv::OktaApiToken)?) {
            (Some(org_name), Some(api_token)) => Some(OktaSettings {
                org_name,
                api_token,
            }),
            _ => None,
        };
        let stack_root =
            read(HarnessEnv::StackRoot)?.map_or(defaults.stack_root, PathBuf::from);
        let terraform_bin =
            read(HarnessEnv::TerraformBin)?.map_or(defaults.terraform_bin, PathBuf::from);
        let run_root = read(HarnessEnv::RunRoot)?.map(PathBuf::from);
        let probe_timeout =
            seconds(HarnessEnv::ProbeTimeoutSeconds)?.unwrap_or(defaults.probe_timeout);
        let stderr_events = flag(HarnessEnv::StderrEvents)?;
        Ok(Self {
            aws_region,
            azure_tenant_id,
            keycloak,
            okta,
            stack_root,
            terraform_bin,
            run_root,
            probe_timeout,
            stderr_events,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the trimmed value of `key`.
///
/// A blank provider credential reads as unset; a blank harness key is an error.
fn read(key: HarnessEnv) -> Result<Option<String>, String> {
    let name = key.as_str();
    let Some(raw) = read_env_strict(name)? else {
        return Ok(None);
    };
    let value = raw.trim();
    match (value.is_empty(), key.is_provider()) {
        (false, _) => Ok(Some(value.to_string())),
        (true, true) => Ok(None),
        (true, false) => Err(format!("{name} is set but blank")),
    }
}

/// Returns the raw value of `name`, or an error naming it when the value is
/// not UTF-8.
///
/// # Errors
///
/// Returns an error when the variable holds non-UTF-8 bytes.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(format!("{name} is not valid UTF-8")),
    }
}

/// Whole seconds, at least one.
fn seconds(key: HarnessEnv) -> Result<Option<Duration>, String> {
    let Some(raw) = read(key)? else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(format!(
            "{} expects a whole number of seconds above zero, got `{raw}`",
            key.as_str()
        )),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
    }
}

/// `1`/`true` or `0`/`false`, case-insensitive; unset is false.
fn flag(key: HarnessEnv) -> Result<bool, String> {
    match read(key)?.map(|raw| raw.to_ascii_lowercase()).as_deref() {
        None | Some("0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        Some(other) => {
            Err(format!("{} expects 1, 0, true, or false, got `{other}`", key.as_str()))
        }
    }
}
