// crates/iam-harness-providers/src/providers/mod.rs
// ============================================================================
// Module: Identity Provider Stacks
// Description: Stack locations, variable schemas, and validator sets.
// Purpose: Describe each identity-provider stack the harness provisions.
// Dependencies: iam-harness-core, serde
// ============================================================================

//! ## Overview
//! Each provider module pairs a typed variable schema with the validator sets
//! that judge the stack's outputs. [`ProviderVariables`] wraps the schemas so a
//! scenario is built the same way regardless of provider.
//! Invariants:
//! - Optional schema fields that are unset are omitted, so the stack default
//!   applies.
//! - Rejection substrings are literal engine diagnostics and must not be
//!   reworded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use iam_harness_core::RetryPolicy;
use iam_harness_core::ScenarioConfig;
use iam_harness_core::ScenarioConfigBuilder;
use serde::Serialize;

// ============================================================================
// SECTION: Constrained Values
// ============================================================================

/// Declares a string-valued enum with an `Unchecked` escape hatch.
///
/// `Unchecked` passes an arbitrary value to the stack so rejection scenarios
/// can exercise the stack's own validation.
macro_rules! constrained_value {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)+
            /// Value passed through without checking.
            Unchecked(String),
        }

        impl $name {
            /// Returns the value sent to the stack.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unchecked(value) => value,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

// ============================================================================
// SECTION: Provider Modules
// ============================================================================

pub mod azure_ad;
pub mod cognito;
pub mod keycloak;
pub mod okta;

pub use azure_ad::AzureAdVariables;
pub use cognito::CognitoBasicVariables;
pub use cognito::CognitoModuleVariables;
pub use keycloak::KeycloakVariables;
pub use okta::OktaVariables;

// ============================================================================
// SECTION: Shared Schema Types
// ============================================================================

/// Resource tags applied by every stack.
pub type Tags = BTreeMap<String, String>;

/// Tags marking resources created by the harness.
#[must_use]
pub fn harness_tags() -> Tags {
    [("Environment", "test"), ("Project", "iam-harness"), ("ManagedBy", "terraform")]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Appends a fresh unique suffix to `prefix`.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", iam_harness_core::unique_id())
}

// ============================================================================
// SECTION: Provider Kinds
// ============================================================================

/// Identity-provider stack family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    /// Standalone Cognito example stack.
    CognitoBasic,
    /// Reusable Cognito module.
    CognitoModule,
    /// Azure AD SSO example stack.
    AzureAd,
    /// Keycloak realm setup stack.
    Keycloak,
    /// Okta integration stack.
    Okta,
}

impl ProviderKind {
    /// Every provider kind.
    pub const ALL: [Self; 5] =
        [Self::CognitoBasic, Self::CognitoModule, Self::AzureAd, Self::Keycloak, Self::Okta];

    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CognitoBasic => "cognito_basic",
            Self::CognitoModule => "cognito_module",
            Self::AzureAd => "azure_ad",
            Self::Keycloak => "keycloak",
            Self::Okta => "okta",
        }
    }

    /// Stack directory relative to the stack root.
    #[must_use]
    pub const fn stack_location(self) -> &'static str {
        match self {
            Self::CognitoBasic => "examples/aws-cognito-basic",
            Self::CognitoModule => "modules/aws-cognito",
            Self::AzureAd => "examples/azure-ad-sso",
            Self::Keycloak => "examples/keycloak-setup",
            Self::Okta => "examples/okta-integration",
        }
    }

    /// Retry policy scenarios for this provider start from.
    ///
    /// AWS stacks retry transient failures; the others run a single attempt.
    #[must_use]
    pub fn default_retry_policy(self) -> RetryPolicy {
        match self {
            Self::CognitoBasic | Self::CognitoModule => RetryPolicy::standard(),
            Self::AzureAd | Self::Keycloak | Self::Okta => RetryPolicy::none(),
        }
    }

    /// Returns true when the stack directory exists under `stack_root`.
    #[must_use]
    pub fn stack_present(self, stack_root: &Path) -> bool {
        crate::terraform::is_stack_dir(&stack_root.join(self.stack_location()))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Provider Variables
// ============================================================================

/// Variable schema for one provider stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderVariables {
    /// Cognito example stack variables.
    CognitoBasic(CognitoBasicVariables),
    /// Cognito module variables.
    CognitoModule(CognitoModuleVariables),
    /// Azure AD stack variables.
    AzureAd(AzureAdVariables),
    /// Keycloak stack variables.
    Keycloak(KeycloakVariables),
    /// Okta stack variables.
    Okta(OktaVariables),
}

impl ProviderVariables {
    /// Returns the provider kind the schema belongs to.
    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::CognitoBasic(_) => ProviderKind::CognitoBasic,
            Self::CognitoModule(_) => ProviderKind::CognitoModule,
            Self::AzureAd(_) => ProviderKind::AzureAd,
            Self::Keycloak(_) => ProviderKind::Keycloak,
            Self::Okta(_) => ProviderKind::Okta,
        }
    }

    /// Starts a scenario for the provider's stack with these variables and
    /// the provider's default retry policy.
    #[must_use]
    pub fn scenario(&self, name: impl Into<String>) -> ScenarioConfigBuilder {
        let kind = self.kind();
        ScenarioConfig::builder(name, kind.stack_location())
            .variables(self)
            .retry_policy(kind.default_retry_policy())
    }
}

impl From<CognitoBasicVariables> for ProviderVariables {
    fn from(value: CognitoBasicVariables) -> Self {
        Self::CognitoBasic(value)
    }
}

impl From<CognitoModuleVariables> for ProviderVariables {
    fn from(value: CognitoModuleVariables) -> Self {
        Self::CognitoModule(value)
    }
}

impl From<AzureAdVariables> for ProviderVariables {
    fn from(value: AzureAdVariables) -> Self {
        Self::AzureAd(value)
    }
}

impl From<KeycloakVariables> for ProviderVariables {
    fn from(value: KeycloakVariables) -> Self {
        Self::Keycloak(value)
    }
}

impl From<OktaVariables> for ProviderVariables {
    fn from(value: OktaVariables) -> Self {
        Self::Okta(value)
    }
}
