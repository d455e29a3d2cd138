// crates/iam-harness-providers/src/providers/azure_ad.rs
// ============================================================================
// Module: Azure AD Stack
// Description: Variable schema and validators for the Azure AD SSO stack.
// Purpose: Describe app registrations, web settings, and app roles.
// Dependencies: iam-harness-core, serde
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use iam_harness_core::Check;
use iam_harness_core::ExpectationSet;
use iam_harness_core::Validator;
use serde::Serialize;

use super::Tags;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Substring of the stack's rejection of an unknown sign-in audience.
pub const AUDIENCE_REJECTION: &str = "Sign-in audience must be one of";
/// Environment variable carrying the tenant id.
pub const TENANT_ENV: &str = "ARM_TENANT_ID";
/// Lowercase hyphenated UUID.
pub const APPLICATION_ID_PATTERN: &str =
    r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";
/// Microsoft Graph application id.
pub const MICROSOFT_GRAPH_APP_ID: &str = "00000003-0000-0000-c000-000000000000";

// ============================================================================
// SECTION: Schema Types
// ============================================================================

constrained_value! {
    /// Accounts allowed to sign in to the application.
    pub enum SignInAudience {
        /// Home tenant only.
        MyOrg => "AzureADMyOrg",
        /// Any Azure AD tenant.
        MultipleOrgs => "AzureADMultipleOrgs",
        /// Any tenant plus personal Microsoft accounts.
        MultipleOrgsAndPersonal => "AzureADandPersonalMicrosoftAccount",
        /// Personal Microsoft accounts only.
        PersonalMicrosoftAccount => "PersonalMicrosoftAccount",
    }
}

/// Web platform settings of the app registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebSettings {
    /// Redirect URIs.
    pub redirect_uris: Vec<String>,
    /// Front-channel logout URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout_url: Option<String>,
    /// Application home page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
}

/// Single permission requested from a resource application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceAccess {
    /// Permission id.
    pub id: String,
    /// `Scope` for delegated or `Role` for application permissions.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Permissions requested from one resource application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredResourceAccess {
    /// Resource application id.
    pub resource_app_id: String,
    /// Requested permissions.
    pub resource_access: Vec<ResourceAccess>,
}

impl RequiredResourceAccess {
    /// Delegated `User.Read` on Microsoft Graph.
    #[must_use]
    pub fn graph_user_read() -> Self {
        Self {
            resource_app_id: MICROSOFT_GRAPH_APP_ID.to_string(),
            resource_access: vec![ResourceAccess {
                id: "e1fe6dd8-ba31-4d61-89e7-88639da4683d".to_string(),
                kind: "Scope".to_string(),
            }],
        }
    }
}

/// Application role assignable to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRole {
    /// Name shown in the portal.
    pub display_name: String,
    /// Role description.
    pub description: String,
    /// Claim value; also the key of the `app_role_ids` output.
    pub value: String,
    /// `User` and/or `Application`.
    pub allowed_member_types: Vec<String>,
}

impl AppRole {
    /// Role assignable to users.
    #[must_use]
    pub fn for_users(
        display_name: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            value: value.into(),
            allowed_member_types: vec!["User".to_string()],
        }
    }
}

// ============================================================================
// SECTION: Stack Variables
// ============================================================================

/// Variables of the Azure AD SSO stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AzureAdVariables {
    /// Directory tenant.
    pub tenant_id: String,
    /// App registration display name.
    pub application_name: String,
    /// Sign-in audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_in_audience: Option<SignInAudience>,
    /// Web platform settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_settings: Option<WebSettings>,
    /// Requested API permissions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_resource_access: Vec<RequiredResourceAccess>,
    /// Application roles.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub app_roles: Vec<AppRole>,
    /// Resource tags.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

impl AzureAdVariables {
    /// Tenant and application name, everything else left to the stack.
    #[must_use]
    pub fn new(tenant_id: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            application_name: application_name.into(),
            sign_in_audience: None,
            web_settings: None,
            required_resource_access: Vec::new(),
            app_roles: Vec::new(),
            tags: Tags::new(),
        }
    }
}

// ============================================================================
// SECTION: Validators
// ============================================================================

/// App registration identity and OAuth endpoint outputs.
#[must_use]
pub fn application_validators() -> Vec<Validator> {
    vec![
        Validator::non_empty("application_id", "application_id"),
        Validator::matches("application_id_format", "application_id", APPLICATION_ID_PATTERN),
        Validator::non_empty("object_id", "object_id"),
        Validator::non_empty("service_principal_id", "service_principal_id"),
        Validator::contains(
            "authorization_url_host",
            "oauth2_authorization_url",
            "https://login.microsoftonline.com",
        ),
        Validator::contains(
            "authorization_url_path",
            "oauth2_authorization_url",
            "/oauth2/v2.0/authorize",
        ),
        Validator::contains("token_url_path", "oauth2_token_url", "/oauth2/v2.0/token"),
        Validator::contains(
            "openid_configuration_url",
            "openid_configuration_url",
            "/.well-known/openid_configuration",
        ),
    ]
}

/// Full check of a provisioned SSO app: outputs, live discovery document,
/// and the UUID length of the application id.
#[must_use]
pub fn sso_validators() -> Vec<Validator> {
    let mut validators = application_validators();
    validators.push(Validator::probe(
        "openid_configuration",
        "openid_configuration_url",
        ExpectationSet::discovery(),
    ));
    validators.push(Validator::new(
        "application_id_length",
        Check::Length {
            target: "application_id".into(),
            expected: 36,
        },
    ));
    validators
}

/// Application exists.
#[must_use]
pub fn application_created_validators() -> Vec<Validator> {
    vec![Validator::non_empty("application_id", "application_id")]
}

/// Reported sign-in audience equals `expected`.
#[must_use]
pub fn sign_in_audience_validators(expected: &SignInAudience) -> Vec<Validator> {
    vec![Validator::equals("sign_in_audience", "sign_in_audience", expected.as_str())]
}

/// Every listed role value appears in the `app_role_ids` output.
#[must_use]
pub fn app_role_validators(role_values: &[&str]) -> Vec<Validator> {
    vec![
        Validator::new("app_role_ids_present", Check::MapNonEmpty("app_role_ids".to_string())),
        Validator::map_has_keys("app_role_ids", "app_role_ids", role_values),
    ]
}
