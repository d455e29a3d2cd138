// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for harness system-tests.
// Purpose: Provide runners, a local IdP stub, fixtures, and artifact utilities.
// Dependencies: system-tests, iam-harness-core, iam-harness-providers
// ============================================================================

//! ## Overview
//! Shared helpers for harness system-tests.
//! Invariants:
//! - Offline helpers never reach beyond the loopback interface.
//! - Every test writes a summary, including on panic.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod fixtures;
pub mod idp_stub;
