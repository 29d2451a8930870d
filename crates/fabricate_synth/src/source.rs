//! Injectable entropy and example-value source.
//!
//! All randomness consumed by synthesis flows through a single
//! [`ValueSource`], so generation runs are reproducible in tests by
//! injecting a seeded source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of entropy and plausible example values for synthesis.
///
/// Implementations must be deterministic for a fixed seed if they want
/// reproducible generation runs.
pub trait ValueSource: Send {
    /// Draws a uniform value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Produces a plausible example number.
    fn number(&mut self) -> f64;

    /// Produces an example boolean.
    fn boolean(&mut self) -> bool;

    /// Produces a plausible example string (an "adjective noun" pair).
    fn words(&mut self) -> String;

    /// Produces a plausible example email address on a reserved domain.
    fn example_email(&mut self) -> String;

    /// Picks an index uniformly in `[0, len)`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub(crate) const ADJECTIVES: &[&str] = &[
    "quiet", "brisk", "mellow", "vivid", "sturdy", "gentle", "rapid", "subtle", "bright", "rustic",
    "sleek", "bold", "calm", "eager", "fuzzy", "grand", "humble", "keen", "lively", "minor",
    "noble", "plain", "quirky", "solid",
];

pub(crate) const NOUNS: &[&str] = &[
    "harbor", "meadow", "signal", "lantern", "ridge", "thicket", "orchard", "summit", "valley",
    "canyon", "breeze", "ember", "garden", "hollow", "island", "juncture", "kettle", "ledge",
    "marble", "needle", "outpost", "pebble", "quarry", "river",
];

pub(crate) fn words_with(rng: &mut impl Rng) -> String {
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    format!("{adjective} {noun}")
}

pub(crate) fn email_with(rng: &mut impl Rng) -> String {
    let user = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let tag = NOUNS[rng.random_range(0..NOUNS.len())];
    let number: u16 = rng.random_range(0..100);
    format!("{user}.{tag}{number}@example.com")
}

/// [`ValueSource`] backed by a seedable pseudo-random generator.
#[derive(Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Creates a source seeded from operating-system entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible source from an explicit seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSource for RandomSource {
    fn unit(&mut self) -> f64 {
        self.rng.random_range(0.0..1.0)
    }

    fn number(&mut self) -> f64 {
        f64::from(self.rng.random_range(0..=100_000))
    }

    fn boolean(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    fn words(&mut self) -> String {
        words_with(&mut self.rng)
    }

    fn example_email(&mut self) -> String {
        email_with(&mut self.rng)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}
