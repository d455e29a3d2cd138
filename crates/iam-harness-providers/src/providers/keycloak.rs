// crates/iam-harness-providers/src/providers/keycloak.rs
// ============================================================================
// Module: Keycloak Stack
// Description: Variable schema and validators for the Keycloak realm stack.
// Purpose: Describe realms, OIDC clients, users, groups, roles, and IdPs.
// Dependencies: iam-harness-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The Keycloak stack talks to a running server, so its validators need the
//! server base URL as well as the stack outputs: the realm info document is
//! served at `<base>/realms/<realm>` and is not a stack output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use iam_harness_core::Check;
use iam_harness_core::CheckFailure;
use iam_harness_core::CheckOutcome;
use iam_harness_core::DiscoveryExpectations;
use iam_harness_core::ExpectationSet;
use iam_harness_core::OutputRef;
use iam_harness_core::ProbeOutcome;
use iam_harness_core::Validator;
use serde::Serialize;
use serde_json::Value;

use super::Tags;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Server URL used when none is configured.
pub const DEFAULT_URL: &str = "http://localhost:8080";
/// Admin user used when none is configured.
pub const DEFAULT_USERNAME: &str = "admin";
/// Admin password used when none is configured.
pub const DEFAULT_PASSWORD: &str = "admin";
/// Server URL the provider cannot reach; apply must fail against it.
pub const UNREACHABLE_URL: &str = "invalid-url";

// ============================================================================
// SECTION: Schema Types
// ============================================================================

/// OIDC client registered in the realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OidcClient {
    /// Client id.
    pub client_id: String,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the client is enabled.
    pub enabled: bool,
    /// Valid redirect URIs.
    pub redirect_uris: Vec<String>,
    /// Allowed CORS origins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub web_origins: Vec<String>,
}

/// Realm user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealmUser {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the account is enabled.
    pub enabled: bool,
}

/// Realm group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealmGroup {
    /// Group name.
    pub name: String,
    /// Group path, e.g. `/Employees/Developers`.
    pub path: String,
}

/// Realm role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealmRole {
    /// Role name.
    pub name: String,
    /// Role description.
    pub description: String,
}

/// Upstream identity provider brokered by the realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityProvider {
    /// Provider type, e.g. `google`.
    pub provider_id: String,
    /// Name on the login page.
    pub display_name: String,
    /// Whether the provider is enabled.
    pub enabled: bool,
    /// Upstream client id.
    pub client_id: String,
    /// Upstream client secret.
    pub client_secret: String,
}

// ============================================================================
// SECTION: Stack Variables
// ============================================================================

/// Variables of the Keycloak realm stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeycloakVariables {
    /// Server base URL.
    pub keycloak_url: String,
    /// Admin user.
    pub keycloak_username: String,
    /// Admin password.
    pub keycloak_password: String,
    /// Realm name.
    pub realm_name: String,
    /// Realm display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm_display_name: Option<String>,
    /// Whether the realm is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm_enabled: Option<bool>,
    /// OIDC clients keyed by output key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub oidc_clients: BTreeMap<String, OidcClient>,
    /// Users keyed by output key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<String, RealmUser>,
    /// Groups keyed by output key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, RealmGroup>,
    /// Realm roles keyed by output key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub realm_roles: BTreeMap<String, RealmRole>,
    /// Identity providers keyed by output key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub identity_providers: BTreeMap<String, IdentityProvider>,
    /// Resource tags.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

impl KeycloakVariables {
    /// Server credentials and realm name, everything else left to the stack.
    #[must_use]
    pub fn new(
        keycloak_url: impl Into<String>,
        keycloak_username: impl Into<String>,
        keycloak_password: impl Into<String>,
        realm_name: impl Into<String>,
    ) -> Self {
        Self {
            keycloak_url: keycloak_url.into(),
            keycloak_username: keycloak_username.into(),
            keycloak_password: keycloak_password.into(),
            realm_name: realm_name.into(),
            realm_display_name: None,
            realm_enabled: None,
            oidc_clients: BTreeMap::new(),
            users: BTreeMap::new(),
            groups: BTreeMap::new(),
            realm_roles: BTreeMap::new(),
            identity_providers: BTreeMap::new(),
            tags: Tags::new(),
        }
    }
}

// ============================================================================
// SECTION: URLs
// ============================================================================

/// Realm info document URL.
#[must_use]
pub fn realm_info_url(base_url: &str, realm_name: &str) -> String {
    format!("{}/realms/{realm_name}", base_url.trim_end_matches('/'))
}

/// Server health URL.
#[must_use]
pub fn health_url(base_url: &str) -> String {
    format!("{}/health", base_url.trim_end_matches('/'))
}

// ============================================================================
// SECTION: Validators
// ============================================================================

/// Discovery document rules for a Keycloak realm.
#[must_use]
pub fn discovery_expectations() -> DiscoveryExpectations {
    DiscoveryExpectations::standard()
        .with_key("end_session_endpoint")
        .with_scope("openid")
        .with_scope("profile")
        .with_scope("email")
}

/// Realm identity, client and user maps, and endpoint URL shapes.
#[must_use]
pub fn realm_validators() -> Vec<Validator> {
    vec![
        Validator::non_empty("realm_id", "realm_id"),
        Validator::non_empty("realm_name", "realm_name"),
        Validator::new("client_ids_present", Check::MapNonEmpty("client_ids".to_string())),
        Validator::new("user_ids_present", Check::MapNonEmpty("user_ids".to_string())),
        Validator::contains(
            "openid_configuration_url",
            "openid_configuration_url",
            "/.well-known/openid_configuration",
        ),
        Validator::contains("token_endpoint", "token_endpoint", "/token"),
        Validator::contains("authorization_endpoint", "authorization_endpoint", "/auth"),
        Validator::contains("userinfo_endpoint", "userinfo_endpoint", "/userinfo"),
        Validator::contains("jwks_uri", "jwks_uri", "/certs"),
        Validator::new(
            "issuer_names_realm",
            Check::ContainsOutput {
                target: "issuer".into(),
                source: "realm_name".into(),
            },
        ),
    ]
}

/// The realm info document names the realm and reports it enabled.
#[must_use]
pub fn realm_info_validator(base_url: &str) -> Validator {
    let base_url = base_url.to_string();
    Validator::custom("realm_info", move |outputs, probe| {
        let realm_name = OutputRef::from("realm_name").resolve(outputs)?;
        let probe = probe.ok_or(CheckFailure::ProbeUnavailable)?;
        let fields = BTreeMap::from([
            ("realm".to_string(), Value::String(realm_name.to_string())),
            ("enabled".to_string(), Value::Bool(true)),
        ]);
        let url = realm_info_url(&base_url, realm_name);
        match probe.probe(&url, &ExpectationSet::JsonFields(fields))? {
            ProbeOutcome::Verified {
                ..
            } => Ok(CheckOutcome::Passed),
            ProbeOutcome::Tolerated {
                reason,
            } => Ok(CheckOutcome::Tolerated(reason)),
        }
    })
}

/// Every OIDC client has a non-empty secret.
#[must_use]
pub fn client_secret_validators() -> Vec<Validator> {
    vec![
        Validator::new("client_ids_present", Check::MapNonEmpty("client_ids".to_string())),
        Validator::new(
            "client_secrets_present",
            Check::MapNonEmpty("client_secrets".to_string()),
        ),
        Validator::new(
            "client_secrets_cover_clients",
            Check::MapCovers {
                output: "client_ids".to_string(),
                other: "client_secrets".to_string(),
            },
        ),
    ]
}

/// Full check of a provisioned realm against the server at `base_url`.
#[must_use]
pub fn setup_validators(base_url: &str) -> Vec<Validator> {
    let mut validators = realm_validators();
    validators.push(realm_info_validator(base_url));
    validators.push(Validator::probe(
        "openid_configuration",
        "openid_configuration_url",
        ExpectationSet::Discovery(discovery_expectations()),
    ));
    validators.extend(client_secret_validators());
    validators
}

/// Realm exists.
#[must_use]
pub fn realm_created_validators() -> Vec<Validator> {
    vec![Validator::non_empty("realm_id", "realm_id")]
}

/// Every listed key appears in the named map output, e.g. `client_ids`,
/// `group_ids`, `realm_role_ids`, or `identity_provider_ids`.
#[must_use]
pub fn keyed_output_validators(output: &str, keys: &[&str]) -> Vec<Validator> {
    vec![
        Validator::new(format!("{output}_present"), Check::MapNonEmpty(output.to_string())),
        Validator::map_has_keys(output, output, keys),
    ]
}

/// Server answers on its health URL with any status.
#[must_use]
pub fn health_validator(base_url: &str) -> Validator {
    let url = health_url(base_url);
    Validator::custom("server_reachable", move |_outputs, probe| {
        let probe = probe.ok_or(CheckFailure::ProbeUnavailable)?;
        match probe.probe(&url, &ExpectationSet::Reachable)? {
            ProbeOutcome::Verified {
                ..
            } => Ok(CheckOutcome::Passed),
            ProbeOutcome::Tolerated {
                reason,
            } => Ok(CheckOutcome::Tolerated(reason)),
        }
    })
}
