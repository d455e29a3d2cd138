// system-tests/tests/suites/offline.rs
// ============================================================================
// Module: Offline Scenario Tests
// Description: Full provider scenarios against an emulated stack and IdP stub.
// Purpose: Exercise variables, validators, probes, and teardown without cloud.
// Dependencies: system-tests helpers
// ============================================================================

//! Offline scenario tests: every provider's variables and validator sets run
//! through the real runner and HTTP probe, with a scripted engine standing in
//! for Terraform and a loopback stub standing in for the identity provider.

use std::error::Error;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use iam_harness_core::CheckFailure;
use iam_harness_core::EngineStep;
use iam_harness_core::OutputSet;
use iam_harness_core::ProbeError;
use iam_harness_core::RetryPolicy;
use iam_harness_core::ScenarioConfig;
use iam_harness_core::Validator;
use iam_harness_core::runner::PLAN_ONLY_VALIDATOR;
use iam_harness_providers::ProviderKind;
use iam_harness_providers::ProviderVariables;
use iam_harness_providers::providers::azure_ad;
use iam_harness_providers::providers::azure_ad::AppRole;
use iam_harness_providers::providers::azure_ad::AzureAdVariables;
use iam_harness_providers::providers::azure_ad::SignInAudience;
use iam_harness_providers::providers::azure_ad::WebSettings;
use iam_harness_providers::providers::cognito;
use iam_harness_providers::providers::cognito::AdvancedSecurityMode;
use iam_harness_providers::providers::cognito::CognitoBasicVariables;
use iam_harness_providers::providers::cognito::MfaConfiguration;
use iam_harness_providers::providers::cognito::PasswordPolicy;
use iam_harness_providers::providers::harness_tags;
use iam_harness_providers::providers::keycloak;
use iam_harness_providers::providers::keycloak::KeycloakVariables;
use iam_harness_providers::providers::okta;
use iam_harness_providers::providers::okta::OAuthAppType;
use iam_harness_providers::providers::okta::OktaGroup;
use iam_harness_providers::providers::okta::OktaVariables;
use iam_harness_providers::providers::unique_name;
use serde_json::Value;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::fixtures;
use crate::helpers::harness::emulated_stack;
use crate::helpers::harness::keycloak_health;
use crate::helpers::harness::offline_runner;
use crate::helpers::idp_stub::IdpStub;
use crate::helpers::idp_stub::Routes;
use crate::helpers::idp_stub::StubResponse;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn scenario(name: &str, variables: impl Into<ProviderVariables>) -> ScenarioConfig {
    let variables = variables.into();
    let policy = variables.kind().default_retry_policy().with_backoff(Duration::ZERO);
    variables
        .scenario(name)
        .env(cognito::AWS_REGION_ENV, cognito::DEFAULT_REGION)
        .retry_policy(policy)
        .build()
        .expect("scenario config")
}

fn cognito_variables() -> CognitoBasicVariables {
    let mut variables =
        CognitoBasicVariables::new(unique_name("test-pool"), unique_name("test-client"));
    variables.aws_region = Some(cognito::DEFAULT_REGION.to_string());
    variables.environment = Some("test".to_string());
    variables.callback_urls = vec![
        "https://localhost:3000/auth/callback".to_string(),
        "https://test.example.com/auth/callback".to_string(),
    ];
    variables.logout_urls = vec!["https://localhost:3000/logout".to_string()];
    variables.password_policy = Some(PasswordPolicy::standard());
    variables.mfa_configuration = Some(MfaConfiguration::Optional);
    variables.software_token_mfa_enabled = Some(true);
    variables.advanced_security_mode = Some(AdvancedSecurityMode::Audit);
    variables.tags = harness_tags();
    variables.with_identity_pool(unique_name("test-identity"))
}

fn keycloak_variables(url: &str) -> KeycloakVariables {
    KeycloakVariables::new(
        url,
        keycloak::DEFAULT_USERNAME,
        keycloak::DEFAULT_PASSWORD,
        fixtures::REALM,
    )
}

fn okta_variables() -> OktaVariables {
    OktaVariables::new("dev-123456", "00offline-token", unique_name("test-app"))
}

fn event_outcomes(reporter: &TestReporter, event: &str) -> Vec<String> {
    reporter
        .artifacts()
        .read_events()
        .expect("event log")
        .into_iter()
        .filter(|entry| entry["event"] == event)
        .filter_map(|entry| entry["outcome"].as_str().map(ToString::to_string))
        .collect()
}

fn summary_artifacts() -> Vec<String> {
    vec!["summary.json".to_string(), "summary.md".to_string(), "events.jsonl".to_string()]
}

// ============================================================================
// SECTION: Cognito
// ============================================================================

#[test]
fn cognito_basic_scenario_validates_outputs_and_redirect() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("cognito_basic_scenario_validates_outputs_and_redirect")?;
    let stub = IdpStub::spawn(fixtures::identity_routes)?;
    let engine =
        emulated_stack(ProviderKind::CognitoBasic, fixtures::cognito_outputs(stub.base_url()));
    let runner = offline_runner(&reporter, engine)?;
    let config = scenario("cognito-basic", cognito_variables());

    let mut validators = cognito::basic_validators();
    validators.extend(cognito::authenticated_role_validators());
    let outputs = runner.run(&config, &validators)?;

    assert_eq!(outputs.string("user_pool_id")?, "us-east-1_AbC123xyz");
    assert_eq!(
        runner.engine().calls(),
        vec![EngineStep::Init, EngineStep::Apply, EngineStep::Output, EngineStep::Destroy]
    );
    assert!(stub.requests().iter().any(|path| path == fixtures::COGNITO_AUTHORIZE_PATH));
    assert_eq!(config.variable("mfa_configuration"), Some(&Value::from("OPTIONAL")));
    assert_eq!(event_outcomes(&reporter, "teardown"), vec!["ok".to_string()]);
    assert!(!event_outcomes(&reporter, "validator").iter().any(|outcome| outcome == "error"));

    reporter.artifacts().write_json("outputs.json", &outputs)?;
    let mut artifacts = summary_artifacts();
    artifacts.push("outputs.json".to_string());
    reporter.finish("pass", vec!["cognito basic scenario validated".to_string()], artifacts)?;
    Ok(())
}

#[test]
fn cognito_invalid_mfa_is_rejected_at_plan() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("cognito_invalid_mfa_is_rejected_at_plan")?;
    let engine = emulated_stack(ProviderKind::CognitoBasic, OutputSet::new());
    let runner = offline_runner(&reporter, engine)?;
    let mut variables = CognitoBasicVariables::new("test-validation", "test-validation-client");
    variables.mfa_configuration = Some(MfaConfiguration::Unchecked("INVALID_VALUE".to_string()));

    let rejection =
        runner.plan_only(&scenario("cognito-validation", variables), cognito::MFA_REJECTION)?;

    assert!(rejection.contains(cognito::MFA_REJECTION));
    assert!(!rejection.message.contains(cognito::MFA_REJECTION), "diagnostic should be wrapped");
    assert_eq!(runner.engine().calls(), vec![EngineStep::Init, EngineStep::Plan]);

    reporter.artifacts().write_text("rejection.txt", &rejection.message)?;
    let mut artifacts = summary_artifacts();
    artifacts.push("rejection.txt".to_string());
    reporter.finish("pass", vec!["invalid MFA mode rejected before apply".to_string()], artifacts)?;
    Ok(())
}

#[test]
fn plan_rejected_for_another_reason_is_an_assertion_failure() -> Result<(), Box<dyn Error>> {
    let mut reporter =
        TestReporter::new("plan_rejected_for_another_reason_is_an_assertion_failure")?;
    let engine = emulated_stack(ProviderKind::CognitoBasic, OutputSet::new());
    let runner = offline_runner(&reporter, engine)?;
    let mut variables = CognitoBasicVariables::new("test-validation", "test-validation-client");
    variables.advanced_security_mode = Some(AdvancedSecurityMode::Unchecked("BOGUS".to_string()));

    let failure = runner
        .plan_only(&scenario("cognito-wrong-rejection", variables), cognito::MFA_REJECTION)
        .expect_err("rejection names a different variable");

    let assertion = failure.assertion().expect("assertion failure");
    assert_eq!(assertion.validator, PLAN_ONLY_VALIDATOR);
    assert_eq!(assertion.expected(), Some(cognito::MFA_REJECTION));
    assert_eq!(runner.engine().count(EngineStep::Apply), 0);
    assert_eq!(runner.engine().count(EngineStep::Destroy), 0);

    reporter.finish("pass", vec!["unrelated rejection reported".to_string()], summary_artifacts())?;
    Ok(())
}

#[test]
fn cognito_transient_apply_failure_is_retried() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("cognito_transient_apply_failure_is_retried")?;
    let outputs = fixtures::cognito_outputs("http://127.0.0.1:9");
    let engine = emulated_stack(ProviderKind::CognitoBasic, outputs).fail(
        EngineStep::Apply,
        "Error: Post \"https://cognito-idp.us-east-1.amazonaws.com/\": \
         read: connection reset by peer",
    );
    let runner = offline_runner(&reporter, engine)?;
    let config =
        scenario("cognito-retry", CognitoBasicVariables::new("test-retry", "test-retry-client"));
    assert_eq!(config.retry_policy().max_attempts(), RetryPolicy::DEFAULT_MAX_ATTEMPTS);

    runner.run(&config, &cognito::client_created_validators())?;

    assert_eq!(runner.engine().count(EngineStep::Apply), 2);
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);
    assert!(event_outcomes(&reporter, "engine_step").iter().any(|outcome| outcome == "retry"));

    reporter.finish(
        "pass",
        vec!["transient failure retried once".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}

#[test]
fn cognito_permanent_apply_failure_still_tears_down() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("cognito_permanent_apply_failure_still_tears_down")?;
    let engine = emulated_stack(ProviderKind::CognitoBasic, OutputSet::new())
        .fail(EngineStep::Apply, "Error: creating Cognito User Pool: AccessDeniedException");
    let runner = offline_runner(&reporter, engine)?;
    let config =
        scenario("cognito-denied", CognitoBasicVariables::new("test-denied", "test-denied-client"));

    let failure =
        runner.run(&config, &cognito::pool_created_validators()).expect_err("apply denied");

    let provision = failure.provision().expect("provision error");
    assert_eq!(provision.attempts, 1);
    assert!(provision.message.contains("AccessDeniedException"));
    assert!(failure.teardown.is_none());
    assert_eq!(runner.engine().count(EngineStep::Output), 0);
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);

    reporter.finish(
        "pass",
        vec!["non-transient failure not retried".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}

#[test]
fn panicking_validator_still_tears_down() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("panicking_validator_still_tears_down")?;
    let engine =
        emulated_stack(ProviderKind::CognitoBasic, fixtures::cognito_outputs("http://127.0.0.1:9"));
    let runner = offline_runner(&reporter, engine)?;
    let config =
        scenario("cognito-panic", CognitoBasicVariables::new("test-panic", "test-panic-client"));
    let validators = [Validator::custom("explodes", |_outputs, _probe| panic!("validator bug"))];

    let result = std::panic::catch_unwind(AssertUnwindSafe(|| runner.run(&config, &validators)));

    assert!(result.is_err());
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);

    reporter.finish(
        "pass",
        vec!["teardown ran during unwinding".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Azure AD
// ============================================================================

#[test]
fn azure_sso_scenario_checks_discovery_and_roles() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("azure_sso_scenario_checks_discovery_and_roles")?;
    let stub = IdpStub::spawn(fixtures::identity_routes)?;
    let engine = emulated_stack(ProviderKind::AzureAd, fixtures::azure_outputs(stub.base_url()));
    let runner = offline_runner(&reporter, engine)?;

    let mut variables = AzureAdVariables::new(fixtures::AZURE_TENANT, unique_name("test-app"));
    variables.sign_in_audience = Some(SignInAudience::MyOrg);
    variables.web_settings = Some(WebSettings {
        redirect_uris: vec!["https://localhost:3000/auth/callback".to_string()],
        logout_url: Some("https://test.example.com/logout".to_string()),
        home_page_url: Some("https://test.example.com".to_string()),
    });
    variables.app_roles = vec![
        AppRole::for_users("Administrator", "Application administrators", "Admin"),
        AppRole::for_users("User", "Standard users", "User"),
    ];
    variables.tags = harness_tags();

    let mut validators = azure_ad::sso_validators();
    validators.extend(azure_ad::sign_in_audience_validators(&SignInAudience::MyOrg));
    validators.extend(azure_ad::app_role_validators(&["Admin", "User"]));
    runner.run(&scenario("azure-sso", variables), &validators)?;

    assert!(stub.requests().iter().any(|path| path == fixtures::AZURE_DISCOVERY_PATH));
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);

    reporter.finish("pass", vec!["azure sso scenario validated".to_string()], summary_artifacts())?;
    Ok(())
}

#[test]
fn azure_invalid_audience_is_rejected_at_plan() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("azure_invalid_audience_is_rejected_at_plan")?;
    let runner =
        offline_runner(&reporter, emulated_stack(ProviderKind::AzureAd, OutputSet::new()))?;
    let mut variables = AzureAdVariables::new(fixtures::AZURE_TENANT, "test-validation");
    variables.sign_in_audience = Some(SignInAudience::Unchecked("InvalidAudience".to_string()));

    let rejection =
        runner.plan_only(&scenario("azure-validation", variables), azure_ad::AUDIENCE_REJECTION)?;

    assert!(rejection.message.contains("InvalidAudience"));
    assert_eq!(runner.engine().count(EngineStep::Apply), 0);

    reporter.finish(
        "pass",
        vec!["invalid audience rejected before apply".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}

#[test]
fn azure_missing_discovery_document_fails_the_scenario() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("azure_missing_discovery_document_fails_the_scenario")?;
    let stub = IdpStub::spawn(fixtures::identity_routes)?;
    let outputs = fixtures::azure_outputs(stub.base_url()).with_scalar(
        "openid_configuration_url",
        format!("{}/missing/v2.0/.well-known/openid_configuration", stub.base_url()),
    );
    let runner = offline_runner(&reporter, emulated_stack(ProviderKind::AzureAd, outputs))?;
    let config = scenario(
        "azure-missing-discovery",
        AzureAdVariables::new(fixtures::AZURE_TENANT, "test-missing"),
    );

    let failure =
        runner.run(&config, &azure_ad::sso_validators()).expect_err("discovery is missing");

    let assertion = failure.assertion().expect("assertion failure");
    assert_eq!(assertion.validator, "openid_configuration");
    assert!(matches!(
        assertion.cause,
        CheckFailure::Probe(ProbeError::Status {
            status: 404,
            ..
        })
    ));
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);
    assert_eq!(event_outcomes(&reporter, "teardown"), vec!["ok".to_string()]);

    reporter.finish(
        "pass",
        vec!["missing discovery document is fatal".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Keycloak
// ============================================================================

#[test]
fn keycloak_setup_probes_realm_discovery_and_health() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("keycloak_setup_probes_realm_discovery_and_health")?;
    let stub = IdpStub::spawn(fixtures::identity_routes)?;
    let base = stub.base_url().to_string();
    let runner = offline_runner(
        &reporter,
        emulated_stack(ProviderKind::Keycloak, fixtures::keycloak_outputs(&base)),
    )?;

    let mut validators = keycloak::setup_validators(&base);
    validators.push(keycloak::health_validator(&base));
    runner.run(&scenario("keycloak-setup", keycloak_variables(&base)), &validators)?;

    let requests = stub.requests();
    for path in [
        fixtures::keycloak_realm_path(),
        fixtures::keycloak_discovery_path(),
        fixtures::KEYCLOAK_HEALTH_PATH.to_string(),
    ] {
        assert!(requests.contains(&path), "{path} was not requested: {requests:?}");
    }

    reporter.finish("pass", vec!["keycloak realm validated".to_string()], summary_artifacts())?;
    Ok(())
}

#[test]
fn keycloak_client_without_secret_fails_coverage() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("keycloak_client_without_secret_fails_coverage")?;
    let outputs = fixtures::keycloak_outputs("http://127.0.0.1:9")
        .with_map("client_ids", [("webapp", "5c1d9a7e"), ("mobile", "8e2f0b1c")]);
    let runner = offline_runner(&reporter, emulated_stack(ProviderKind::Keycloak, outputs))?;
    let config = scenario("keycloak-secrets", keycloak_variables("http://127.0.0.1:9"));

    let failure =
        runner.run(&config, &keycloak::client_secret_validators()).expect_err(
            "mobile has no secret",
        );

    assert_eq!(
        failure.assertion().expect("assertion failure").validator,
        "client_secrets_cover_clients",
    );
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);

    reporter.finish(
        "pass",
        vec!["missing client secret detected".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}

#[test]
fn keycloak_unreachable_server_fails_provisioning() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("keycloak_unreachable_server_fails_provisioning")?;
    let engine = emulated_stack(ProviderKind::Keycloak, OutputSet::new()).fail(
        EngineStep::Apply,
        "Error: error initializing keycloak provider: \
         Post \"invalid-url/realms/master/protocol/openid-connect/token\": \
         unsupported protocol scheme \"\"",
    );
    let runner = offline_runner(&reporter, engine)?;
    let config = scenario("keycloak-validation", keycloak_variables(keycloak::UNREACHABLE_URL));

    if runner.plan(&config).is_ok() {
        let failure =
            runner.run(&config, &keycloak::realm_created_validators()).expect_err(
                "apply must fail",
            );
        assert!(failure.provision().is_some());
    }
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);

    reporter.finish("pass", vec!["unreachable server rejected".to_string()], summary_artifacts())?;
    Ok(())
}

#[test]
fn keycloak_health_accepts_any_answer_and_tolerates_silence() -> Result<(), Box<dyn Error>> {
    let mut reporter =
        TestReporter::new("keycloak_health_accepts_any_answer_and_tolerates_silence")?;
    let stub = IdpStub::spawn(|_| Routes::new())?;
    let answered = keycloak_health(&format!("{}/", stub.base_url()), Duration::from_secs(5))?;
    assert!(answered.contains("status 404"), "unexpected note: {answered}");
    assert_eq!(stub.requests(), vec!["/health".to_string()]);

    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let closed = format!("http://{}", listener.local_addr()?);
    drop(listener);
    let silent = keycloak_health(&closed, Duration::from_secs(5))?;
    assert!(silent.starts_with("server not reachable"), "unexpected note: {silent}");

    let files = vec!["summary.json".to_string(), "summary.md".to_string()];
    reporter.finish("pass", vec![answered, silent], files)?;
    Ok(())
}

// ============================================================================
// SECTION: Okta
// ============================================================================

#[test]
fn okta_saml_scenario_checks_metadata_and_groups() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("okta_saml_scenario_checks_metadata_and_groups")?;
    let stub = IdpStub::spawn(fixtures::identity_routes)?;
    let engine = emulated_stack(ProviderKind::Okta, fixtures::okta_saml_outputs(stub.base_url()));
    let runner = offline_runner(&reporter, engine)?;

    let mut variables = okta_variables();
    variables.create_saml_app = Some(true);
    variables.sso_url = Some("https://test.example.com/saml/acs".to_string());
    variables.audience = Some("https://test.example.com".to_string());
    variables.groups.insert(
        "test-users".to_string(),
        OktaGroup::native("Test Users", "Test users group"),
    );
    variables.groups.insert(
        "test-admins".to_string(),
        OktaGroup::native("Test Admins", "Test administrators group"),
    );

    let mut validators = okta::saml_app_validators();
    validators.extend(okta::group_validators(&["test-users", "test-admins"]));
    runner.run(&scenario("okta-saml", variables), &validators)?;

    assert!(stub.requests().contains(&fixtures::okta_metadata_path()));

    reporter.finish("pass", vec!["okta saml scenario validated".to_string()], summary_artifacts())?;
    Ok(())
}

#[test]
fn okta_oauth_scenario_checks_issuer_host() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("okta_oauth_scenario_checks_issuer_host")?;
    let stub = IdpStub::spawn(fixtures::identity_routes)?;
    let engine = emulated_stack(ProviderKind::Okta, fixtures::okta_oauth_outputs(stub.base_url()));
    let runner = offline_runner(&reporter, engine)?;
    let variables = okta_variables().with_oauth_app(OAuthAppType::Web);

    runner.run(&scenario("okta-oauth", variables), &okta::oauth_app_validators())?;

    assert!(stub.requests().iter().any(|path| path == fixtures::OKTA_DISCOVERY_PATH));

    reporter.finish(
        "pass",
        vec!["okta oauth scenario validated".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}

#[test]
fn okta_issuer_outside_org_fails_discovery() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("okta_issuer_outside_org_fails_discovery")?;
    let stub = IdpStub::spawn(|base| {
        let mut routes = fixtures::identity_routes(base);
        routes.insert(
            fixtures::OKTA_DISCOVERY_PATH.to_string(),
            StubResponse::json(&fixtures::discovery_document(base, &format!("{base}/v1"))),
        );
        routes
    })?;
    let engine = emulated_stack(ProviderKind::Okta, fixtures::okta_oauth_outputs(stub.base_url()));
    let runner = offline_runner(&reporter, engine)?;
    let config =
        scenario("okta-foreign-issuer", okta_variables().with_oauth_app(OAuthAppType::Web));

    let failure =
        runner.run(&config, &okta::oauth_app_validators()).expect_err("issuer is not an Okta host");

    let assertion = failure.assertion().expect("assertion failure");
    assert_eq!(assertion.validator, "openid_configuration");
    assert!(matches!(
        &assertion.cause,
        CheckFailure::Probe(ProbeError::MissingValue { field, .. }) if field == "issuer"
    ));
    assert_eq!(runner.engine().count(EngineStep::Destroy), 1);

    reporter.finish("pass", vec!["foreign issuer rejected".to_string()], summary_artifacts())?;
    Ok(())
}

#[test]
fn okta_invalid_oauth_type_is_rejected_at_plan() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("okta_invalid_oauth_type_is_rejected_at_plan")?;
    let runner = offline_runner(&reporter, emulated_stack(ProviderKind::Okta, OutputSet::new()))?;
    let variables =
        okta_variables().with_oauth_app(OAuthAppType::Unchecked("invalid-type".to_string()));

    runner.plan_only(&scenario("okta-validation", variables), okta::OAUTH_TYPE_REJECTION)?;

    assert_eq!(runner.engine().calls(), vec![EngineStep::Init, EngineStep::Plan]);

    reporter.finish(
        "pass",
        vec!["invalid oauth type rejected before apply".to_string()],
        summary_artifacts(),
    )?;
    Ok(())
}
