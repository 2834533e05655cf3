//! Startup jitter for periodic loops.

use std::time::Duration;

use rand::Rng;

/// Upper bound on the random delay added to every loop's first run.
pub const STARTUP_JITTER_MAX: Duration = Duration::from_secs(60);

/// A uniformly random duration in `[0, bound)`.
///
/// Pure in the injected `Rng` so tests can drive it with a seeded
/// generator.
pub fn jitter_within<R: Rng>(rng: &mut R, bound: Duration) -> Duration {
    if bound.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_millis(rng.gen_range(0..bound.as_millis() as u64))
}

/// The standard startup jitter: uniform in `[0, 60s)`.
pub fn startup_jitter<R: Rng>(rng: &mut R) -> Duration {
    jitter_within(rng, STARTUP_JITTER_MAX)
}
