//! Obstacles (gated barrier pairs) and their procedural placement

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::tuning::Tuning;

/// Source of gap positions
///
/// Production wiring uses [`RandGapSource`]; tests script exact sequences.
pub trait GapSource {
    /// Draw a gap top uniformly from the inclusive range
    fn gap_top(&mut self, range: RangeInclusive<u32>) -> u32;
}

/// `GapSource` backed by any `rand` RNG
#[derive(Debug, Clone)]
pub struct RandGapSource<R> {
    rng: R,
}

impl<R: Rng> RandGapSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandGapSource<Pcg32> {
    /// Unseeded source; every run gets a different course
    pub fn from_entropy() -> Self {
        Self::new(Pcg32::from_rng(&mut rand::rng()))
    }

    /// Reproducible source for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GapSource for RandGapSource<R> {
    fn gap_top(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.random_range(range)
    }
}

/// A top/bottom barrier pair with a vertical gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge, moves left every tick
    pub x: f32,
    /// Height of the top barrier (where the gap starts)
    pub gap_top: f32,
    pub width: f32,
    /// Set once the trailing edge has crossed the bird
    pub passed: bool,
}

impl Obstacle {
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Top barrier, from the ceiling down to the gap
    pub fn top_barrier(&self) -> Rect {
        Rect::new(self.x, self.trailing_edge(), 0.0, self.gap_top)
    }

    /// Bottom barrier, from the end of the gap to the floor
    pub fn bottom_barrier(&self, gap_size: f32, field_height: f32) -> Rect {
        Rect::new(
            self.x,
            self.trailing_edge(),
            self.gap_top + gap_size,
            field_height,
        )
    }
}

/// Create a new obstacle at the right edge of the field
///
/// Panics if the tuning leaves no room for a gap; `Tuning::validate`
/// rejects such parameter sets before a round can start.
pub fn spawn<G: GapSource + ?Sized>(tuning: &Tuning, gaps: &mut G) -> Obstacle {
    let range = tuning.gap_top_range();
    assert!(
        range.start() <= range.end(),
        "obstacle gap range {:?} is empty (field {} / gap {} / min arm {})",
        range,
        tuning.field_height,
        tuning.gap_size,
        tuning.min_arm
    );

    let gap_top = gaps.gap_top(range);
    Obstacle {
        x: tuning.field_width,
        gap_top: gap_top as f32,
        width: tuning.obstacle_width,
        passed: false,
    }
}
