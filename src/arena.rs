//! Arena size automation.
//!
//! Generates the `(x, y)` pairs fed to `$arena size x y`. Three variants:
//!
//! - **Random** (type 1): every pair drawn independently from even values in bounds.
//! - **In-phase** (type 2): both axes start at the low bound and bounce together.
//! - **Inverse-phase** (type 3): x starts low, y starts high, so they move apart.
//!
//! The bounce variants reflect off the bounds: an overshoot is clamped to the
//! bound and the following step reverses sign. Sequences are lazy and
//! unbounded; [`run`] drives one through an [`Emit`] sink until a count limit
//! or cancellation stops it.

use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::instrument;

use crate::cancel::CancellationToken;
use crate::emit::Emit;

/// Inclusive bounds accepted by the game's `$arena size` command.
pub const ARENA_BOUNDS: Bounds = Bounds { low: 2, high: 1024 };

/// Step used when none is given or the given one is unusable.
pub const DEFAULT_STEP: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("Invalid step {0}: must be a positive even integer")]
    InvalidStep(i32),
    #[error("Invalid bounds: low {low} is greater than high {high}")]
    InvalidBounds { low: i32, high: i32 },
}

/// Inclusive `[low, high]` range for one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    low: i32,
    high: i32,
}

impl Bounds {
    pub fn new(low: i32, high: i32) -> Result<Self, ArenaError> {
        if low > high {
            return Err(ArenaError::InvalidBounds { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> i32 {
        self.low
    }

    pub fn high(&self) -> i32 {
        self.high
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

/// Which sequence an automation run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
    /// Random even sizes
    #[value(alias = "1")]
    Random,
    /// Both dimensions bounce together
    #[value(alias = "2")]
    InPhase,
    /// Dimensions bounce in opposite directions
    #[value(alias = "3")]
    InversePhase,
}

impl Variant {
    pub fn description(&self) -> &'static str {
        match self {
            Variant::Random => "Random arena sizes",
            Variant::InPhase => "Bouncing dimensions",
            Variant::InversePhase => "Inverse bouncing dimensions",
        }
    }

    /// Whether the variant uses the step size at all.
    pub fn uses_step(&self) -> bool {
        !matches!(self, Variant::Random)
    }
}

/// Oscillation state of a single coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BounceAxis {
    value: i32,
    direction: i32,
}

impl BounceAxis {
    pub fn new(value: i32, direction: i32) -> Self {
        Self { value, direction }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Move one step, reflecting off the bounds.
    ///
    /// An overshoot lands exactly on the bound and flips the direction for the
    /// next call; the value never leaves `bounds`, even transiently.
    pub fn advance(&mut self, bounds: Bounds, step: i32) {
        let next = self.value.saturating_add(self.direction);
        if next > bounds.high {
            self.value = bounds.high;
            self.direction = -step;
        } else if next < bounds.low {
            self.value = bounds.low;
            self.direction = step;
        } else {
            self.value = next;
        }
    }
}

/// Two independently bouncing axes sharing a step and bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BounceSequencer {
    x: BounceAxis,
    y: BounceAxis,
    step: i32,
    bounds: Bounds,
}

impl BounceSequencer {
    /// Both axes start at `low` moving up.
    pub fn in_phase(step: i32, bounds: Bounds) -> Result<Self, ArenaError> {
        validate_step(step)?;
        Ok(Self {
            x: BounceAxis::new(bounds.low, step),
            y: BounceAxis::new(bounds.low, step),
            step,
            bounds,
        })
    }

    /// x starts at `low` moving up, y starts at `high` moving down.
    pub fn inverse_phase(step: i32, bounds: Bounds) -> Result<Self, ArenaError> {
        validate_step(step)?;
        Ok(Self {
            x: BounceAxis::new(bounds.low, step),
            y: BounceAxis::new(bounds.high, -step),
            step,
            bounds,
        })
    }

    /// The pair the next call to [`next_pair`](Self::next_pair) returns.
    pub fn peek(&self) -> (i32, i32) {
        (self.x.value, self.y.value)
    }

    /// Return the current pair, then advance both axes.
    pub fn next_pair(&mut self) -> (i32, i32) {
        let pair = self.peek();
        self.x.advance(self.bounds, self.step);
        self.y.advance(self.bounds, self.step);
        pair
    }
}

/// Independent uniform draws of even values within bounds.
#[derive(Debug, Clone)]
pub struct RandomSequencer {
    rng: StdRng,
    half_low: i32,
    half_high: i32,
}

impl RandomSequencer {
    /// Seeded sequencers are reproducible; `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>, bounds: Bounds) -> Result<Self, ArenaError> {
        let half_low = bounds.low.div_euclid(2) + bounds.low.rem_euclid(2);
        let half_high = bounds.high.div_euclid(2);
        if half_low > half_high {
            // No even value fits
            return Err(ArenaError::InvalidBounds {
                low: bounds.low,
                high: bounds.high,
            });
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            half_low,
            half_high,
        })
    }

    fn generate_even(&mut self) -> i32 {
        self.rng.gen_range(self.half_low..=self.half_high) * 2
    }

    pub fn next_pair(&mut self) -> (i32, i32) {
        let x = self.generate_even();
        let y = self.generate_even();
        (x, y)
    }
}

/// Any of the arena pair generators.
#[derive(Debug, Clone)]
pub enum ArenaSequence {
    Bounce(BounceSequencer),
    Random(RandomSequencer),
}

impl ArenaSequence {
    pub fn next_pair(&mut self) -> (i32, i32) {
        match self {
            ArenaSequence::Bounce(seq) => seq.next_pair(),
            ArenaSequence::Random(seq) => seq.next_pair(),
        }
    }
}

impl Iterator for ArenaSequence {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_pair())
    }
}

/// Build the sequence for `variant` over [`ARENA_BOUNDS`].
///
/// `step` must be positive and even for the bounce variants; the random
/// variant ignores it. `seed` only affects the random variant.
pub fn create_sequencer(
    variant: Variant,
    step: i32,
    seed: Option<u64>,
) -> Result<ArenaSequence, ArenaError> {
    match variant {
        Variant::Random => Ok(ArenaSequence::Random(RandomSequencer::new(
            seed,
            ARENA_BOUNDS,
        )?)),
        Variant::InPhase => Ok(ArenaSequence::Bounce(BounceSequencer::in_phase(
            step,
            ARENA_BOUNDS,
        )?)),
        Variant::InversePhase => Ok(ArenaSequence::Bounce(BounceSequencer::inverse_phase(
            step,
            ARENA_BOUNDS,
        )?)),
    }
}

fn validate_step(step: i32) -> Result<(), ArenaError> {
    if step <= 0 || step % 2 != 0 {
        return Err(ArenaError::InvalidStep(step));
    }
    Ok(())
}

/// Replace an unusable step with [`DEFAULT_STEP`], warning about it.
pub fn normalize_step(step: i32) -> i32 {
    if validate_step(step).is_err() {
        tracing::warn!(
            "step {} is not a positive even integer, using {}",
            step,
            DEFAULT_STEP
        );
        return DEFAULT_STEP;
    }
    step
}

/// Limits for [`run`]. Zero means "no limit" for both fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after this many emissions.
    pub max_count: u64,
    /// Emissions per second.
    pub rate_limit: u32,
}

impl RunOptions {
    /// Pause after each emission, truncated to whole microseconds.
    pub fn delay(&self) -> Option<Duration> {
        (self.rate_limit > 0)
            .then(|| Duration::from_micros(1_000_000 / u64::from(self.rate_limit)))
    }
}

/// Drive `sequence` through `emitter` until cancelled or `max_count` is hit.
///
/// The token is polled once per iteration, before each emission, so nothing
/// is emitted after cancellation is observed. Returns the number of pairs
/// emitted.
#[instrument(skip(sequence, emitter, token))]
pub fn run(
    sequence: &mut ArenaSequence,
    emitter: &mut dyn Emit,
    options: RunOptions,
    token: &CancellationToken,
) -> u64 {
    let delay = options.delay();
    let mut count: u64 = 0;

    while !token.is_cancelled() && (options.max_count == 0 || count < options.max_count) {
        let (x, y) = sequence.next_pair();
        emitter.emit(x, y);
        count += 1;

        if let Some(delay) = delay {
            thread::sleep(delay);
        }
    }

    if options.max_count > 0 && count >= options.max_count {
        tracing::info!("Reached {} commands, stopping", options.max_count);
    } else {
        tracing::debug!("Stopped after {} commands", count);
    }

    count
}
