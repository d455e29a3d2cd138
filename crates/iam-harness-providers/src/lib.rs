// crates/iam-harness-providers/src/lib.rs
// ============================================================================
// Module: IAM Harness Providers Library
// Description: Terraform engine, HTTP probe, and identity-provider stacks.
// Purpose: Bind the harness core to real infrastructure and live endpoints.
// Dependencies: iam-harness-core, reqwest, serde, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This crate supplies the concrete pieces the harness core abstracts over:
//! [`TerraformEngine`] implements the provisioning engine, [`HttpEndpointProbe`]
//! implements the endpoint probe, and [`providers`] describes the Cognito,
//! Azure AD, Keycloak, and Okta stacks with their variables and validators.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod probe;
pub mod providers;
pub mod terraform;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use probe::HttpEndpointProbe;
pub use probe::ProbeSetupError;
pub use providers::ProviderKind;
pub use providers::ProviderVariables;
pub use terraform::DEFAULT_TERRAFORM_BIN;
pub use terraform::TerraformConfig;
pub use terraform::TerraformEngine;
pub use terraform::is_stack_dir;
pub use terraform::parse_output_json;
