// system-tests/tests/helpers/fixtures.rs
// ============================================================================
// Module: Provider Fixtures
// Description: Realistic stack outputs and IdP documents for offline suites.
// Purpose: Mirror what each provider stack reports, pointed at a local stub.
// Dependencies: iam-harness-core, serde_json
// ============================================================================

//! ## Overview
//! Output sets here match the output names and value shapes of the real
//! stacks. Endpoints that validators probe point at the [`IdpStub`] base URL;
//! purely structural values keep their production hosts.
//!
//! [`IdpStub`]: super::idp_stub::IdpStub

use iam_harness_core::OutputSet;
use serde_json::Value;
use serde_json::json;

use super::idp_stub::Routes;
use super::idp_stub::StubResponse;

pub const REALM: &str = "harness-realm";
pub const AZURE_TENANT: &str = "7f3e2a10-4b5c-4d6e-8f90-a1b2c3d4e5f6";
pub const AZURE_APPLICATION_ID: &str = "0b5e4c1e-8f3a-4d2b-9c7e-1a2b3c4d5e6f";
pub const OKTA_ORG: &str = "https://dev-123456.okta.com";
pub const OKTA_SAML_APP_ID: &str = "0oa1b2c3d4e5F6g7h8";

// ============================================================================
// SECTION: Documents
// ============================================================================

/// OpenID discovery document for `issuer`.
pub fn discovery_document(issuer: &str, endpoint_base: &str) -> Value {
    json!({
        "issuer": issuer,
        "authorization_endpoint": format!("{endpoint_base}/authorize"),
        "token_endpoint": format!("{endpoint_base}/token"),
        "userinfo_endpoint": format!("{endpoint_base}/userinfo"),
        "jwks_uri": format!("{endpoint_base}/certs"),
        "end_session_endpoint": format!("{endpoint_base}/logout"),
        "response_types_supported": ["code", "id_token", "code id_token"],
        "scopes_supported": ["openid", "profile", "email", "offline_access"]
    })
}

// ============================================================================
// SECTION: Paths
// ============================================================================

pub const COGNITO_AUTHORIZE_PATH: &str = "/oauth2/authorize";
pub const AZURE_DISCOVERY_PATH: &str = "/tenant/v2.0/.well-known/openid_configuration";
pub const KEYCLOAK_HEALTH_PATH: &str = "/health";
pub const OKTA_DISCOVERY_PATH: &str = "/oauth2/default/.well-known/openid_configuration";

pub fn keycloak_realm_path() -> String {
    format!("/realms/{REALM}")
}

pub fn keycloak_discovery_path() -> String {
    format!("/realms/{REALM}/.well-known/openid_configuration")
}

pub fn okta_metadata_path() -> String {
    format!("/app/{OKTA_SAML_APP_ID}/sso/saml/metadata")
}

fn okta_sso_url() -> String {
    format!("{OKTA_ORG}/app/harness/{OKTA_SAML_APP_ID}/sso/saml")
}

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Every provider endpoint the offline suites probe, answered correctly.
pub fn identity_routes(base: &str) -> Routes {
    let realm_issuer = format!("{base}/realms/{REALM}");
    Routes::from([
        (COGNITO_AUTHORIZE_PATH.to_string(), StubResponse::redirect(format!("{base}/login"))),
        (
            AZURE_DISCOVERY_PATH.to_string(),
            StubResponse::json(&discovery_document(
                &format!("https://login.microsoftonline.com/{AZURE_TENANT}/v2.0"),
                &format!("https://login.microsoftonline.com/{AZURE_TENANT}/oauth2/v2.0"),
            )),
        ),
        (keycloak_realm_path(), StubResponse::json(&json!({"realm": REALM, "enabled": true}))),
        (
            keycloak_discovery_path(),
            StubResponse::json(&discovery_document(
                &realm_issuer,
                &format!("{realm_issuer}/protocol/openid-connect"),
            )),
        ),
        (KEYCLOAK_HEALTH_PATH.to_string(), StubResponse::status(404)),
        (
            okta_metadata_path(),
            StubResponse::saml_metadata(&format!("http://www.okta.com/{OKTA_SAML_APP_ID}")),
        ),
        (
            OKTA_DISCOVERY_PATH.to_string(),
            StubResponse::json(&discovery_document(
                &format!("{OKTA_ORG}/oauth2/default"),
                &format!("{OKTA_ORG}/oauth2/default/v1"),
            )),
        ),
    ])
}

// ============================================================================
// SECTION: Outputs
// ============================================================================

/// Cognito example stack with an identity pool.
pub fn cognito_outputs(base: &str) -> OutputSet {
    let pool = "us-east-1_AbC123xyz";
    OutputSet::new()
        .with_scalar("user_pool_id", pool)
        .with_scalar(
            "user_pool_arn",
            format!("arn:aws:cognito-idp:us-east-1:123456789012:userpool/{pool}"),
        )
        .with_scalar(
            "user_pool_endpoint",
            format!("https://cognito-idp.us-east-1.amazonaws.com/{pool}"),
        )
        .with_scalar("user_pool_client_id", "4tq1k9example2client3id")
        .with_scalar("user_pool_domain", "test-pool-abc123")
        .with_scalar(
            "hosted_ui_url",
            "https://test-pool-abc123.auth.us-east-1.amazoncognito.com/login",
        )
        .with_map(
            "oauth_endpoints",
            [
                ("authorization_endpoint", format!("{base}{COGNITO_AUTHORIZE_PATH}")),
                ("token_endpoint", format!("{base}/oauth2/token")),
                ("userinfo_endpoint", format!("{base}/oauth2/userInfo")),
            ],
        )
        .with_scalar("identity_pool_id", "us-east-1:1a2b3c4d-5e6f-7a8b-9c0d-ef1234567890")
        .with_scalar(
            "authenticated_role_arn",
            "arn:aws:iam::123456789012:role/test-pool-abc123-authenticated",
        )
}

/// Azure AD SSO stack with two app roles.
pub fn azure_outputs(base: &str) -> OutputSet {
    OutputSet::new()
        .with_scalar("application_id", AZURE_APPLICATION_ID)
        .with_scalar("object_id", "9d8c7b6a-5f4e-4d3c-2b1a-0f9e8d7c6b5a")
        .with_scalar("service_principal_id", "1f2e3d4c-5b6a-4798-8a7b-6c5d4e3f2a1b")
        .with_scalar(
            "oauth2_authorization_url",
            format!("https://login.microsoftonline.com/{AZURE_TENANT}/oauth2/v2.0/authorize"),
        )
        .with_scalar(
            "oauth2_token_url",
            format!("https://login.microsoftonline.com/{AZURE_TENANT}/oauth2/v2.0/token"),
        )
        .with_scalar("openid_configuration_url", format!("{base}{AZURE_DISCOVERY_PATH}"))
        .with_scalar("sign_in_audience", "AzureADMyOrg")
        .with_map(
            "app_role_ids",
            [
                ("Admin", "6a1f0d2e-0000-4000-8000-000000000001"),
                ("User", "6a1f0d2e-0000-4000-8000-000000000002"),
            ],
        )
}

/// Keycloak realm with one client and one user.
pub fn keycloak_outputs(base: &str) -> OutputSet {
    let issuer = format!("{base}/realms/{REALM}");
    let oidc = format!("{issuer}/protocol/openid-connect");
    OutputSet::new()
        .with_scalar("realm_id", REALM)
        .with_scalar("realm_name", REALM)
        .with_map("client_ids", [("webapp", "5c1d9a7e-3b2f-4e8a-9d6c-0a1b2c3d4e5f")])
        .with_map("client_secrets", [("webapp", "s3cr3t-webapp")])
        .with_map("user_ids", [("testuser", "a7b8c9d0-e1f2-4a3b-8c4d-5e6f7a8b9c0d")])
        .with_scalar("openid_configuration_url", format!("{base}{}", keycloak_discovery_path()))
        .with_scalar("token_endpoint", format!("{oidc}/token"))
        .with_scalar("authorization_endpoint", format!("{oidc}/auth"))
        .with_scalar("userinfo_endpoint", format!("{oidc}/userinfo"))
        .with_scalar("jwks_uri", format!("{oidc}/certs"))
        .with_scalar("issuer", issuer)
}

/// Okta integration stack with a SAML app and two groups.
pub fn okta_saml_outputs(base: &str) -> OutputSet {
    OutputSet::new()
        .with_scalar("saml_app_id", OKTA_SAML_APP_ID)
        .with_scalar("saml_metadata_url", format!("{base}{}", okta_metadata_path()))
        .with_scalar("saml_sso_url", okta_sso_url())
        .with_scalar("okta_sign_on_url", okta_sso_url())
        .with_map("group_ids", [("test-users", "00g1users"), ("test-admins", "00g2admins")])
}

/// Okta integration stack with an OAuth app.
pub fn okta_oauth_outputs(base: &str) -> OutputSet {
    OutputSet::new()
        .with_scalar("oauth_app_id", "0oa9oauthapp")
        .with_scalar("oauth_client_id", "0oa9oauthclient")
        .with_scalar("oauth_authorization_url", format!("{OKTA_ORG}/oauth2/default/v1/authorize"))
        .with_scalar("oauth_token_url", format!("{OKTA_ORG}/oauth2/default/v1/token"))
        .with_scalar("oauth_userinfo_url", format!("{OKTA_ORG}/oauth2/default/v1/userinfo"))
        .with_scalar("openid_configuration_url", format!("{base}{OKTA_DISCOVERY_PATH}"))
}
