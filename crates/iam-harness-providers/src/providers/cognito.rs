// crates/iam-harness-providers/src/providers/cognito.rs
// ============================================================================
// Module: Cognito Stacks
// Description: Variable schemas and validators for the Cognito stacks.
// Purpose: Describe user pools, clients, identity pools, and SAML providers.
// Dependencies: iam-harness-core, serde
// ============================================================================

//! ## Overview
//! Two stacks provision Cognito: the standalone example
//! ([`CognitoBasicVariables`]) and the reusable module
//! ([`CognitoModuleVariables`]). Both read the region from
//! [`AWS_REGION_ENV`] on the engine process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use iam_harness_core::ExpectationSet;
use iam_harness_core::OutputRef;
use iam_harness_core::Validator;
use serde::Serialize;

use super::Tags;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Substring of the stack's rejection of an unknown MFA mode.
pub const MFA_REJECTION: &str = "MFA configuration must be";
/// Environment variable the AWS provider reads its region from.
pub const AWS_REGION_ENV: &str = "AWS_DEFAULT_REGION";
/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";
/// User pool id shape: `<region>_<suffix>`.
pub const USER_POOL_ID_PATTERN: &str = r"^[a-zA-Z0-9_-]+_[a-zA-Z0-9]+$";
/// IAM role ARN shape.
pub const ROLE_ARN_PATTERN: &str = r"^arn:aws[a-z-]*:iam::[0-9]{12}:role/.+$";

// ============================================================================
// SECTION: Schema Types
// ============================================================================

constrained_value! {
    /// User pool MFA mode.
    pub enum MfaConfiguration {
        /// MFA disabled.
        Off => "OFF",
        /// MFA offered to users.
        Optional => "OPTIONAL",
        /// MFA required for every sign-in.
        Required => "REQUIRED",
    }
}

constrained_value! {
    /// Advanced security (adaptive auth) mode.
    pub enum AdvancedSecurityMode {
        /// Disabled.
        Off => "OFF",
        /// Risk is scored but not acted on.
        Audit => "AUDIT",
        /// Risk is scored and enforced.
        Enforced => "ENFORCED",
    }
}

/// Password complexity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordPolicy {
    /// Minimum password length.
    pub minimum_length: u32,
    /// Requires a lowercase letter.
    pub require_lowercase: bool,
    /// Requires an uppercase letter.
    pub require_uppercase: bool,
    /// Requires a digit.
    pub require_numbers: bool,
    /// Requires a symbol.
    pub require_symbols: bool,
}

impl PasswordPolicy {
    /// Eight characters, mixed case and digits, symbols optional.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            minimum_length: 8,
            require_lowercase: true,
            require_uppercase: true,
            require_numbers: true,
            require_symbols: false,
        }
    }

    /// Every character class required, with the given minimum length.
    #[must_use]
    pub const fn strict(minimum_length: u32) -> Self {
        Self {
            minimum_length,
            require_lowercase: true,
            require_uppercase: true,
            require_numbers: true,
            require_symbols: true,
        }
    }
}

/// Lambda functions attached to user pool events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LambdaTriggers {
    /// Pre sign-up trigger ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_sign_up: Option<String>,
    /// Post confirmation trigger ARN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_confirmation: Option<String>,
}

/// SAML identity provider federated into the user pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamlProvider {
    /// Provider name shown on the hosted UI.
    pub provider_name: String,
    /// IdP metadata document URL.
    pub metadata_url: String,
    /// SSO redirect binding URI.
    pub sso_redirect_binding_uri: String,
    /// SLO redirect binding URI.
    pub slo_redirect_binding_uri: String,
    /// User pool attribute to SAML claim mapping.
    pub attribute_mapping: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Stack Variables
// ============================================================================

/// Variables of the standalone Cognito example stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CognitoBasicVariables {
    /// Region the pool is created in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    /// User pool name.
    pub user_pool_name: String,
    /// App client name.
    pub client_name: String,
    /// Environment label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// OAuth callback URLs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub callback_urls: Vec<String>,
    /// Sign-out URLs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logout_urls: Vec<String>,
    /// Password rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_policy: Option<PasswordPolicy>,
    /// MFA mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_configuration: Option<MfaConfiguration>,
    /// Enables TOTP MFA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_token_mfa_enabled: Option<bool>,
    /// Enables SMS MFA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_mfa_enabled: Option<bool>,
    /// Advanced security mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_security_mode: Option<AdvancedSecurityMode>,
    /// Creates a federated identity pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_identity_pool: Option<bool>,
    /// Identity pool name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_pool_name: Option<String>,
    /// User pool triggers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lambda_triggers: Option<LambdaTriggers>,
    /// Resource tags.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

impl CognitoBasicVariables {
    /// Pool and client names, everything else left to the stack.
    #[must_use]
    pub fn new(user_pool_name: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            aws_region: None,
            user_pool_name: user_pool_name.into(),
            client_name: client_name.into(),
            environment: None,
            callback_urls: Vec::new(),
            logout_urls: Vec::new(),
            password_policy: None,
            mfa_configuration: None,
            software_token_mfa_enabled: None,
            sms_mfa_enabled: None,
            advanced_security_mode: None,
            create_identity_pool: None,
            identity_pool_name: None,
            lambda_triggers: None,
            tags: Tags::new(),
        }
    }

    /// Enables an identity pool with the given name.
    #[must_use]
    pub fn with_identity_pool(mut self, name: impl Into<String>) -> Self {
        self.create_identity_pool = Some(true);
        self.identity_pool_name = Some(name.into());
        self
    }
}

/// Variables of the reusable Cognito module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CognitoModuleVariables {
    /// User pool name.
    pub user_pool_name: String,
    /// App client name.
    pub client_name: String,
    /// Password rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_policy: Option<PasswordPolicy>,
    /// Advanced security mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_security_mode: Option<AdvancedSecurityMode>,
    /// SAML providers keyed by provider name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub saml_providers: BTreeMap<String, SamlProvider>,
    /// Creates a federated identity pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_identity_pool: Option<bool>,
    /// Identity pool name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_pool_name: Option<String>,
    /// Resource tags.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

impl CognitoModuleVariables {
    /// Pool and client names, everything else left to the module.
    #[must_use]
    pub fn new(user_pool_name: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            user_pool_name: user_pool_name.into(),
            client_name: client_name.into(),
            password_policy: None,
            advanced_security_mode: None,
            saml_providers: BTreeMap::new(),
            create_identity_pool: None,
            identity_pool_name: None,
            tags: Tags::new(),
        }
    }

    /// Enables an identity pool with the given name.
    #[must_use]
    pub fn with_identity_pool(mut self, name: impl Into<String>) -> Self {
        self.create_identity_pool = Some(true);
        self.identity_pool_name = Some(name.into());
        self
    }

    /// Adds a SAML provider keyed by its name.
    #[must_use]
    pub fn with_saml_provider(mut self, provider: SamlProvider) -> Self {
        self.saml_providers.insert(provider.provider_name.clone(), provider);
        self
    }
}

// ============================================================================
// SECTION: Validators
// ============================================================================

/// Identity and endpoint outputs of the example stack.
#[must_use]
pub fn user_pool_validators() -> Vec<Validator> {
    vec![
        Validator::non_empty("user_pool_id", "user_pool_id"),
        Validator::matches("user_pool_id_format", "user_pool_id", USER_POOL_ID_PATTERN),
        Validator::contains("user_pool_arn", "user_pool_arn", "arn:aws:cognito-idp:"),
        Validator::contains("user_pool_endpoint", "user_pool_endpoint", "https://cognito-idp."),
        Validator::non_empty("user_pool_client_id", "user_pool_client_id"),
        Validator::map_has_keys(
            "oauth_endpoints",
            "oauth_endpoints",
            &["authorization_endpoint", "token_endpoint", "userinfo_endpoint"],
        ),
        Validator::contains("hosted_ui_auth_host", "hosted_ui_url", ".auth."),
        Validator::contains("hosted_ui_domain", "hosted_ui_url", ".amazoncognito.com"),
    ]
}

/// Full check of a provisioned example stack: outputs, the authorization
/// endpoint redirect, and the hosted domain.
#[must_use]
pub fn basic_validators() -> Vec<Validator> {
    let mut validators = user_pool_validators();
    validators.push(Validator::probe(
        "authorization_endpoint_redirects",
        OutputRef::entry("oauth_endpoints", "authorization_endpoint"),
        ExpectationSet::Redirect,
    ));
    validators.push(Validator::contains("user_pool_id_region", "user_pool_id", "_"));
    validators.push(Validator::non_empty("user_pool_domain", "user_pool_domain"));
    validators
}

/// Pool exists, nothing else assumed.
#[must_use]
pub fn pool_created_validators() -> Vec<Validator> {
    vec![Validator::non_empty("user_pool_id", "user_pool_id")]
}

/// Pool and app client both exist.
#[must_use]
pub fn client_created_validators() -> Vec<Validator> {
    vec![
        Validator::non_empty("user_pool_id", "user_pool_id"),
        Validator::non_empty("user_pool_client_id", "user_pool_client_id"),
    ]
}

/// User pool and identity pool both exist.
#[must_use]
pub fn identity_pool_validators() -> Vec<Validator> {
    vec![
        Validator::non_empty("user_pool_id", "user_pool_id"),
        Validator::non_empty("identity_pool_id", "identity_pool_id"),
    ]
}

/// Identity pool plus an IAM role for authenticated identities.
#[must_use]
pub fn authenticated_role_validators() -> Vec<Validator> {
    let mut validators = identity_pool_validators();
    validators.push(Validator::contains(
        "authenticated_role_arn",
        "authenticated_role_arn",
        "arn:aws:iam::",
    ));
    validators.push(Validator::matches(
        "authenticated_role_arn_format",
        "authenticated_role_arn",
        ROLE_ARN_PATTERN,
    ));
    validators
}

/// Core module outputs, with the pool id scoped to `region`.
#[must_use]
pub fn module_validators(region: &str) -> Vec<Validator> {
    vec![
        Validator::non_empty("user_pool_id", "user_pool_id"),
        Validator::non_empty("user_pool_arn", "user_pool_arn"),
        Validator::non_empty("user_pool_client_id", "user_pool_client_id"),
        Validator::contains("user_pool_id_region", "user_pool_id", format!("{region}_")),
    ]
}

/// Every named SAML provider appears in the `saml_providers` output.
#[must_use]
pub fn saml_provider_validators(provider_names: &[&str]) -> Vec<Validator> {
    vec![
        Validator::non_empty("user_pool_id", "user_pool_id"),
        Validator::map_has_keys("saml_providers", "saml_providers", provider_names),
    ]
}
