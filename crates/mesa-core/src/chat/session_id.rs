//! Session identifier generation.
//!
//! The default source is a v4 UUID from the OS random generator. The
//! pseudo-random source seeds a `StdRng` from the clock and a process-wide
//! counter, for hosts where the OS generator is unavailable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::{Builder, Uuid};

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Where session ids come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionIdSource {
    #[default]
    Uuid,
    PseudoRandom,
}

impl SessionIdSource {
    /// Produce a fresh session id in canonical hyphenated UUID form.
    pub fn generate(&self) -> String {
        match self {
            SessionIdSource::Uuid => Uuid::new_v4().to_string(),
            SessionIdSource::PseudoRandom => pseudo_random_id(),
        }
    }
}

fn pseudo_random_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = nanos ^ counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);

    let mut rng = StdRng::seed_from_u64(seed);
    let bytes: [u8; 16] = rng.r#gen();
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}
