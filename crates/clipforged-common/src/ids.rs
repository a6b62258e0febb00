//! Job identifiers.
//!
//! A [`JobId`] names exactly one extraction attempt. It is only ever used as a
//! filesystem path component, so it is restricted to lowercase ASCII
//! alphanumerics and carries no meaning beyond uniqueness.

use rand::Rng;
use serde::{Deserialize, Serialize};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Number of random base36 characters appended after the time component.
const RANDOM_SUFFIX_LEN: usize = 6;

/// Opaque identifier for a single clip extraction job.
///
/// Built from the current wall-clock time in milliseconds followed by random
/// bits, which is enough to keep concurrently running jobs that share one
/// temporary directory apart. Not suitable as a secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a new job ID.
    #[must_use]
    pub fn new() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut rng = rand::thread_rng();

        let mut id = to_base36(millis);
        for _ in 0..RANDOM_SUFFIX_LEN {
            id.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
        }

        Self(id)
    }

    /// Borrow the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    // Only ASCII bytes from BASE36 were pushed.
    String::from_utf8_lossy(&digits).into_owned()
}
