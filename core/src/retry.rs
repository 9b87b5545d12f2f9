//! Re-attempt delay sequence: exponential backoff with optional uniform
//! jitter.
//!
//! The schedule is deterministic whenever `jitter_ratio == 0` (no RNG is
//! constructed) or a `jitter_seed` is supplied.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::options::RunOptions;

/// Stateful delay generator. One instance per task; each call to
/// [`BackoffSchedule::next_wait_ms`] yields the wait before the next
/// re-attempt and advances the schedule.
#[derive(Debug)]
pub struct BackoffSchedule {
    delay_ms: u64,
    base_delay_ms: u64,
    backoff_factor: f64,
    jitter_ratio: f64,
    rng: Option<StdRng>,
}

impl BackoffSchedule {
    pub fn new(options: &RunOptions) -> Self {
        // jitter_ratio == 0 must stay fully deterministic.
        let rng = if options.jitter_ratio == 0.0 {
            None
        } else {
            Some(match options.jitter_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            })
        };
        Self {
            delay_ms: options.retry_delay_ms,
            base_delay_ms: options.retry_delay_ms,
            backoff_factor: options.backoff_factor,
            jitter_ratio: options.jitter_ratio,
            rng,
        }
    }

    /// Milliseconds to sleep before the next re-attempt.
    ///
    /// Jittered wait is `max(0, floor(delay + uniform(-1, 1) * ratio *
    /// delay))`. Afterwards the delay advances to `floor(factor * delay)`,
    /// falling back to the base delay if the product floors to zero.
    pub fn next_wait_ms(&mut self) -> u64 {
        let delay = self.delay_ms as f64;
        let jitter = match self.rng.as_mut() {
            Some(rng) => rng.gen_range(-1.0..1.0) * self.jitter_ratio * delay,
            None => 0.0,
        };
        let wait = (delay + jitter).floor().max(0.0) as u64;

        let next = (self.backoff_factor * delay).floor();
        self.delay_ms = if next < 1.0 && self.base_delay_ms > 0 {
            self.base_delay_ms
        } else {
            next as u64
        };

        wait
    }

    #[cfg(test)]
    fn current_delay_ms(&self) -> u64 {
        self.delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(retry_delay_ms: u64, backoff_factor: f64, jitter_ratio: f64) -> RunOptions {
        RunOptions {
            retry_delay_ms,
            backoff_factor,
            jitter_ratio,
            ..RunOptions::default()
        }
    }

    #[test]
    fn no_jitter_doubles_each_step() {
        let mut schedule = BackoffSchedule::new(&options(100, 2.0, 0.0));
        assert_eq!(schedule.next_wait_ms(), 100);
        assert_eq!(schedule.next_wait_ms(), 200);
        assert_eq!(schedule.next_wait_ms(), 400);
        assert_eq!(schedule.next_wait_ms(), 800);
    }

    #[test]
    fn fractional_factor_floors() {
        let mut schedule = BackoffSchedule::new(&options(10, 1.5, 0.0));
        assert_eq!(schedule.next_wait_ms(), 10);
        assert_eq!(schedule.next_wait_ms(), 15); // floor(1.5 * 10)
        assert_eq!(schedule.next_wait_ms(), 22); // floor(1.5 * 15)
    }

    #[test]
    fn collapsed_delay_resets_to_base() {
        // factor 0.05 of 10ms floors to 0, which would stall the schedule.
        let mut schedule = BackoffSchedule::new(&options(10, 0.05, 0.0));
        assert_eq!(schedule.next_wait_ms(), 10);
        assert_eq!(schedule.current_delay_ms(), 10);
        assert_eq!(schedule.next_wait_ms(), 10);
    }

    #[test]
    fn zero_base_delay_stays_zero() {
        let mut schedule = BackoffSchedule::new(&options(0, 2.0, 0.0));
        assert_eq!(schedule.next_wait_ms(), 0);
        assert_eq!(schedule.next_wait_ms(), 0);
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let opts = RunOptions {
            jitter_seed: Some(42),
            ..options(100, 2.0, 0.2)
        };
        let a: Vec<u64> = {
            let mut s = BackoffSchedule::new(&opts);
            (0..4).map(|_| s.next_wait_ms()).collect()
        };
        let b: Vec<u64> = {
            let mut s = BackoffSchedule::new(&opts);
            (0..4).map(|_| s.next_wait_ms()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn jitter_stays_within_ratio_band() {
        let opts = RunOptions {
            jitter_seed: Some(7),
            ..options(100, 1.0, 0.2)
        };
        let mut schedule = BackoffSchedule::new(&opts);
        for _ in 0..50 {
            let wait = schedule.next_wait_ms();
            // delay stays 100 with factor 1.0; wait in [80, 120)
            assert!((80..120).contains(&wait), "wait {wait} out of band");
        }
    }

    #[test]
    fn jitter_never_goes_negative() {
        // ratio > 1 can push delay + jitter below zero; wait clamps at 0.
        let opts = RunOptions {
            jitter_seed: Some(3),
            ..options(10, 1.0, 3.0)
        };
        let mut schedule = BackoffSchedule::new(&opts);
        for _ in 0..100 {
            let wait = schedule.next_wait_ms();
            assert!(wait <= 40, "wait {wait} beyond +ratio band");
        }
    }
}
