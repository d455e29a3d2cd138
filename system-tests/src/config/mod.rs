// system-tests/src/config/mod.rs
// ============================================================================
// Module: Harness Settings
// Description: Centralized configuration for harness system tests.
// Purpose: Provide typed access to provider credentials, paths, and timeouts.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Harness configuration is read from environment variables and mapped into a
//! small typed structure. Provider credentials that have no safe default are
//! optional; live suites skip the provider when they are absent.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::HarnessEnv;
pub use env::HarnessSettings;
pub use env::KeycloakSettings;
pub use env::OktaSettings;
pub use env::read_env_strict;
