// crates/iam-harness-providers/src/providers/okta.rs
// ============================================================================
// Module: Okta Stack
// Description: Variable schema and validators for the Okta integration stack.
// Purpose: Describe SAML and OAuth applications, attribute statements, groups.
// Dependencies: iam-harness-core, serde
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use iam_harness_core::Check;
use iam_harness_core::DiscoveryExpectations;
use iam_harness_core::ExpectationSet;
use iam_harness_core::Validator;
use serde::Serialize;

use super::Tags;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Substring of the stack's rejection of an unknown OAuth app type.
pub const OAUTH_TYPE_REJECTION: &str = "OAuth app type must be one of";
/// Environment variable carrying the org name.
pub const ORG_NAME_ENV: &str = "OKTA_ORG_NAME";
/// Environment variable carrying the API token.
pub const API_TOKEN_ENV: &str = "OKTA_API_TOKEN";
/// Production Okta base domain.
pub const DEFAULT_BASE_URL: &str = "okta.com";
/// Host fragment every Okta org URL carries.
pub const ORG_HOST_FRAGMENT: &str = ".okta.com";
/// Basic SAML attribute name format.
pub const BASIC_ATTRIBUTE_NAMESPACE: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:basic";

// ============================================================================
// SECTION: Schema Types
// ============================================================================

constrained_value! {
    /// OAuth application type.
    pub enum OAuthAppType {
        /// Server-side web application.
        Web => "web",
        /// Native or mobile application.
        Native => "native",
        /// Single-page browser application.
        Browser => "browser",
        /// Machine-to-machine service.
        Service => "service",
    }
}

/// SAML attribute statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeStatement {
    /// Statement type, usually `EXPRESSION`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Attribute name.
    pub name: String,
    /// Attribute name format.
    pub namespace: String,
    /// Okta expressions producing the values.
    pub values: Vec<String>,
}

impl AttributeStatement {
    /// Single-expression statement in the basic name format.
    #[must_use]
    pub fn expression(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            kind: "EXPRESSION".to_string(),
            name: name.into(),
            namespace: BASIC_ATTRIBUTE_NAMESPACE.to_string(),
            values: vec![expression.into()],
        }
    }
}

/// Okta group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OktaGroup {
    /// Group name.
    pub name: String,
    /// Group description.
    pub description: String,
    /// Group type.
    #[serde(rename = "type")]
    pub kind: String,
}

impl OktaGroup {
    /// Native Okta group.
    #[must_use]
    pub fn native(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: "OKTA_GROUP".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Stack Variables
// ============================================================================

/// Variables of the Okta integration stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OktaVariables {
    /// Org subdomain.
    pub okta_org_name: String,
    /// Base domain.
    pub okta_base_url: String,
    /// API token.
    pub okta_api_token: String,
    /// Application label.
    pub app_name: String,
    /// Application description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_description: Option<String>,
    /// Creates the SAML application. The stack defaults to true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_saml_app: Option<bool>,
    /// Creates the OAuth application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_oauth_app: Option<bool>,
    /// OAuth application type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_app_type: Option<OAuthAppType>,
    /// SAML assertion consumer URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sso_url: Option<String>,
    /// SAML audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// SAML destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// SAML attribute statements.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribute_statements: Vec<AttributeStatement>,
    /// OAuth redirect URIs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redirect_uris: Vec<String>,
    /// OAuth post-logout redirect URIs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_logout_redirect_uris: Vec<String>,
    /// Groups keyed by output key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, OktaGroup>,
    /// Resource tags.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,
}

impl OktaVariables {
    /// Org credentials and app name on the production base domain.
    #[must_use]
    pub fn new(
        okta_org_name: impl Into<String>,
        okta_api_token: impl Into<String>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            okta_org_name: okta_org_name.into(),
            okta_base_url: DEFAULT_BASE_URL.to_string(),
            okta_api_token: okta_api_token.into(),
            app_name: app_name.into(),
            app_description: None,
            create_saml_app: None,
            create_oauth_app: None,
            oauth_app_type: None,
            sso_url: None,
            audience: None,
            destination: None,
            attribute_statements: Vec::new(),
            redirect_uris: Vec::new(),
            post_logout_redirect_uris: Vec::new(),
            groups: BTreeMap::new(),
            tags: Tags::new(),
        }
    }

    /// Switches the stack to an OAuth application of the given type.
    #[must_use]
    pub fn with_oauth_app(mut self, app_type: OAuthAppType) -> Self {
        self.create_saml_app = Some(false);
        self.create_oauth_app = Some(true);
        self.oauth_app_type = Some(app_type);
        self
    }
}

// ============================================================================
// SECTION: Validators
// ============================================================================

/// SAML application outputs; the sign-on URL must embed the app id.
#[must_use]
pub fn saml_validators() -> Vec<Validator> {
    vec![
        Validator::non_empty("saml_app_id", "saml_app_id"),
        Validator::contains("saml_metadata_url", "saml_metadata_url", "saml/metadata"),
        Validator::contains("saml_sso_url", "saml_sso_url", "/sso/saml"),
        Validator::contains("okta_sign_on_url_host", "okta_sign_on_url", ORG_HOST_FRAGMENT),
        Validator::new(
            "okta_sign_on_url_app",
            Check::ContainsOutput {
                target: "okta_sign_on_url".into(),
                source: "saml_app_id".into(),
            },
        ),
    ]
}

/// Live SAML metadata is served as XML.
#[must_use]
pub fn saml_endpoint_validators() -> Vec<Validator> {
    vec![Validator::probe("saml_metadata", "saml_metadata_url", ExpectationSet::saml_metadata())]
}

/// At least one group was created.
#[must_use]
pub fn groups_validator() -> Validator {
    Validator::new("group_ids_present", Check::MapNonEmpty("group_ids".to_string()))
}

/// Full check of a provisioned SAML application.
#[must_use]
pub fn saml_app_validators() -> Vec<Validator> {
    let mut validators = saml_validators();
    validators.extend(saml_endpoint_validators());
    validators.push(groups_validator());
    validators
}

/// OAuth application outputs and endpoint URL shapes.
#[must_use]
pub fn oauth_validators() -> Vec<Validator> {
    vec![
        Validator::non_empty("oauth_app_id", "oauth_app_id"),
        Validator::non_empty("oauth_client_id", "oauth_client_id"),
        Validator::contains("authorization_url_host", "oauth_authorization_url", ORG_HOST_FRAGMENT),
        Validator::contains("authorization_url_path", "oauth_authorization_url", "/authorize"),
        Validator::contains("token_url", "oauth_token_url", "/token"),
        Validator::contains("userinfo_url", "oauth_userinfo_url", "/userinfo"),
        Validator::contains(
            "openid_configuration_url",
            "openid_configuration_url",
            "/.well-known/openid_configuration",
        ),
    ]
}

/// Discovery document rules for an Okta authorization server.
#[must_use]
pub fn discovery_expectations() -> DiscoveryExpectations {
    DiscoveryExpectations::standard().with_issuer_fragment(ORG_HOST_FRAGMENT)
}

/// Full check of a provisioned OAuth application.
#[must_use]
pub fn oauth_app_validators() -> Vec<Validator> {
    let mut validators = oauth_validators();
    validators.push(Validator::probe(
        "openid_configuration",
        "openid_configuration_url",
        ExpectationSet::Discovery(discovery_expectations()),
    ));
    validators
}

/// SAML application exists.
#[must_use]
pub fn saml_app_created_validators() -> Vec<Validator> {
    vec![Validator::non_empty("saml_app_id", "saml_app_id")]
}

/// OAuth application exists.
#[must_use]
pub fn oauth_app_created_validators() -> Vec<Validator> {
    vec![Validator::non_empty("oauth_app_id", "oauth_app_id")]
}

/// Every listed key appears in the `group_ids` output.
#[must_use]
pub fn group_validators(keys: &[&str]) -> Vec<Validator> {
    vec![groups_validator(), Validator::map_has_keys("group_ids", "group_ids", keys)]
}
