// crates/iam-harness-core/src/naming.rs
// ============================================================================
// Module: Resource Naming
// Description: Short random suffixes for provisioned resource names.
// Purpose: Keep concurrently running scenarios from colliding.
// Dependencies: rand
// ============================================================================

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of generated identifiers.
pub const UNIQUE_ID_LEN: usize = 6;

/// Returns a random base62 identifier of [`UNIQUE_ID_LEN`] characters.
#[must_use]
pub fn unique_id() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(UNIQUE_ID_LEN).map(char::from).collect()
}
