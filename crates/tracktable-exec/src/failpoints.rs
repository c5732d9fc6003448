//! Failure injection for the simulated service.
//!
//! Keep this extremely light: one probability and one RNG. A rate of 0 never
//! fails and a rate of 1 always fails, without consulting the RNG, so tests at
//! either end are deterministic. A seed makes the rates in between repeatable.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug)]
pub struct FailureInjector {
    rate: f64,
    rng: Mutex<StdRng>,
}

impl FailureInjector {
    pub fn new(rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rate: rate.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }

    pub fn disabled() -> Self {
        Self::new(0.0, Some(0))
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Roll for a simulated transient failure.
    pub fn should_fail(&self) -> bool {
        if self.rate <= 0.0 {
            return false;
        }
        if self.rate >= 1.0 {
            return true;
        }
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_bool(self.rate)
    }
}
