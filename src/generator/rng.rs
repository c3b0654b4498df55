//! Linear congruential sequence behind the sample generator

/// LCG multiplier
pub const LCG_MULTIPLIER: u64 = 9301;

/// LCG increment
pub const LCG_INCREMENT: u64 = 49297;

/// LCG modulus; every value drawn is `state / LCG_MODULUS`
pub const LCG_MODULUS: u64 = 233_280;

/// Seed used when none is supplied
pub const DEFAULT_SEED: u64 = 12345;

/// Tiny deterministic generator producing values in `[0, 1)`.
///
/// Not suitable for anything but reproducible demo data: the period is at
/// most 233280.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    /// Advance one step and return the new value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
