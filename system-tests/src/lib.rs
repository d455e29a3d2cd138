// system-tests/src/lib.rs
// ============================================================================
// Module: IAM Harness System Tests Library
// Description: Shared configuration for the harness system-test binaries.
// Purpose: Read harness settings once and hand them to scenario helpers.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts the settings shared by the offline and live binaries in
//! `system-tests/tests`. Settings come from the environment exactly once per
//! test and travel as an explicit [`config::HarnessSettings`] value.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
