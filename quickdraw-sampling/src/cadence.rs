//! Human-like pacing for automated clicks.
//!
//! Anti-bot heuristics key on evenly spaced requests. The cadence instead
//! mimics a person playing with the quick-tip button: short bursts of 1–3
//! rapid clicks separated by longer pauses, with the pause ceiling growing
//! the longer a run goes on.

use std::time::Duration;

use rand::rngs::OsRng;
use rand::Rng;
use thiserror::Error;

/// Bounds of the short interval between clicks inside a burst, in seconds.
pub const QUICK_MIN_SECS: f64 = 0.4;
pub const QUICK_MAX_SECS: f64 = 1.2;

/// Largest burst of rapid clicks.
pub const CLUSTER_MAX: u32 = 3;

/// Growth factor applied to the backoff ceiling after each pause.
pub const BACKOFF_GROWTH: f64 = 1.3;

/// The backoff ceiling never grows past this many seconds.
pub const BACKOFF_CAP_SECS: f64 = 15.0;

/// Errors from cadence construction.
#[derive(Debug, Error)]
pub enum CadenceError {
    /// Backoff bounds must satisfy `0 < wait_min < wait_max`.
    #[error("invalid backoff bounds {wait_min}..{wait_max}: require 0 < wait_min < wait_max")]
    InvalidBounds { wait_min: f64, wait_max: f64 },
}

/// A finite, lazy plan of wait durations covering exactly the requested
/// number of collection actions.
///
/// Every yielded duration precedes exactly one action, pause ticks included,
/// so consuming the whole iterator drives exactly `samples` actions. The
/// iterator is not restartable; build a new one per run.
///
/// The ceiling of the backoff draw starts at `wait_max` and grows by
/// [`BACKOFF_GROWTH`] after each pause, capped at [`BACKOFF_CAP_SECS`].
///
/// ```rust
/// use quickdraw_sampling::Cadence;
///
/// let cadence = Cadence::new(8, 4.0, 10.0).unwrap();
/// assert_eq!(cadence.count(), 8);
///
/// let empty = Cadence::new(0, 4.0, 10.0).unwrap();
/// assert_eq!(empty.count(), 0);
/// ```
pub struct Cadence<R: Rng = OsRng> {
    remaining: u32,
    in_cluster: u32,
    wait_min: f64,
    ceiling: f64,
    cap: f64,
    rng: R,
}

impl Cadence<OsRng> {
    /// Plan `samples` collection actions with backoff pauses drawn from
    /// `[wait_min, wait_max)` seconds.
    pub fn new(samples: u32, wait_min: f64, wait_max: f64) -> Result<Self, CadenceError> {
        Self::with_rng(samples, wait_min, wait_max, OsRng)
    }
}

impl<R: Rng> Cadence<R> {
    /// Like [`Cadence::new`] but with a caller-supplied RNG, so tests can
    /// seed the plan deterministically.
    pub fn with_rng(
        samples: u32,
        wait_min: f64,
        wait_max: f64,
        mut rng: R,
    ) -> Result<Self, CadenceError> {
        if !wait_min.is_finite() || !wait_max.is_finite() || wait_min <= 0.0 || wait_min >= wait_max
        {
            return Err(CadenceError::InvalidBounds { wait_min, wait_max });
        }

        let in_cluster = if samples == 0 {
            0
        } else {
            rng.gen_range(1..=CLUSTER_MAX).min(samples)
        };

        Ok(Self {
            remaining: samples,
            in_cluster,
            wait_min,
            ceiling: wait_max,
            cap: BACKOFF_CAP_SECS.max(wait_max),
            rng,
        })
    }

    /// Actions still to be scheduled.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl<R: Rng> Iterator for Cadence<R> {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }

        if self.in_cluster > 0 {
            self.in_cluster -= 1;
            self.remaining -= 1;
            let quick = self.rng.gen_range(QUICK_MIN_SECS..QUICK_MAX_SECS);
            return Some(Duration::from_secs_f64(quick));
        }

        // Burst exhausted with budget left: one backoff tick, grow the
        // ceiling, then seed the next burst.
        let wait = self.rng.gen_range(self.wait_min..self.ceiling);
        self.ceiling = (self.ceiling * BACKOFF_GROWTH).min(self.cap);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.in_cluster = self.rng.gen_range(1..=CLUSTER_MAX).min(self.remaining);
        }
        Some(Duration::from_secs_f64(wait))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WAIT_MIN: f64 = 4.0;
    const WAIT_MAX: f64 = 10.0;

    fn seeded(samples: u32, seed: u64) -> Cadence<StdRng> {
        Cadence::with_rng(samples, WAIT_MIN, WAIT_MAX, StdRng::seed_from_u64(seed))
            .expect("valid bounds")
    }

    fn is_quick(wait: &Duration) -> bool {
        // Quick intervals top out well below the backoff floor, so the gap
        // between 1.2 and wait_min cleanly separates the two kinds.
        wait.as_secs_f64() < WAIT_MIN
    }

    #[test]
    fn yields_exactly_the_requested_count() {
        for samples in 0..=40 {
            for seed in 0..8 {
                let yielded = seeded(samples, seed).count();
                assert_eq!(yielded as u32, samples, "samples={samples} seed={seed}");
            }
        }
    }

    #[test]
    fn zero_samples_yield_nothing() {
        assert_eq!(seeded(0, 1).next(), None);
    }

    #[test]
    fn durations_stay_in_their_bands() {
        let waits: Vec<Duration> = seeded(200, 7).collect();
        for wait in &waits {
            let secs = wait.as_secs_f64();
            assert!(secs > 0.0);
            if is_quick(wait) {
                assert!((QUICK_MIN_SECS..QUICK_MAX_SECS).contains(&secs), "quick {secs}");
            } else {
                assert!(secs >= WAIT_MIN, "backoff floor {secs}");
                assert!(secs < BACKOFF_CAP_SECS, "backoff cap {secs}");
            }
        }
        // A long run must contain both bands.
        assert!(waits.iter().any(is_quick));
        assert!(waits.iter().any(|w| !is_quick(w)));
    }

    #[test]
    fn bursts_hold_one_to_three_quick_ticks() {
        for seed in 0..16 {
            let waits: Vec<Duration> = seeded(60, seed).collect();

            let mut burst = 0u32;
            for wait in &waits {
                if is_quick(wait) {
                    burst += 1;
                    assert!(burst <= CLUSTER_MAX, "seed={seed}");
                } else {
                    assert!(burst >= 1, "pause without a preceding burst, seed={seed}");
                    burst = 0;
                }
            }

            // The plan opens with a burst, never a pause.
            assert!(is_quick(&waits[0]), "seed={seed}");
        }
    }

    #[test]
    fn backoff_ceiling_grows_but_respects_the_cap() {
        let backoffs: Vec<f64> = seeded(400, 3)
            .filter(|w| !is_quick(w))
            .map(|w| w.as_secs_f64())
            .collect();

        assert!(backoffs.len() > 50);
        assert!(backoffs.iter().all(|s| *s < BACKOFF_CAP_SECS));
        // Growth is applied: eventually a draw lands above the initial
        // wait_max, which is only reachable once the ceiling has grown.
        assert!(backoffs.iter().any(|s| *s > WAIT_MAX));
    }

    #[test]
    fn rejects_degenerate_bounds() {
        let rng = || StdRng::seed_from_u64(0);
        assert!(Cadence::with_rng(5, 0.0, 10.0, rng()).is_err());
        assert!(Cadence::with_rng(5, -1.0, 10.0, rng()).is_err());
        assert!(Cadence::with_rng(5, 5.0, 5.0, rng()).is_err());
        assert!(Cadence::with_rng(5, 8.0, 4.0, rng()).is_err());
        assert!(Cadence::with_rng(5, f64::NAN, 10.0, rng()).is_err());
    }
}
