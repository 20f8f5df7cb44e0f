//! Round state and core simulation types

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::obstacle::Obstacle;
use crate::tuning::Tuning;

/// Coarse lifecycle of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, nothing moves
    #[default]
    Menu,
    /// A round is running
    Playing,
    /// Round ended, waiting for a restart
    GameOver,
}

/// The player's bird (fixed x, square body)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top edge, measured down from the top of the field
    pub y: f32,
    /// Vertical velocity (positive = falling), units per tick
    pub vel: f32,
}

/// Everything one round owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub tuning: Tuning,
    pub bird: Bird,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Ticks advanced this round
    pub ticks: u64,
    pub score: u32,
    /// Latched once the round-ended event has been emitted
    over: bool,
}

impl SimulationState {
    /// Fresh round with the bird at its start height
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            bird: Bird {
                y: tuning.bird_start_y,
                vel: 0.0,
            },
            obstacles: Vec::new(),
            ticks: 0,
            score: 0,
            over: false,
        }
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub(crate) fn finish(&mut self) {
        self.over = true;
    }

    pub fn bird_rect(&self) -> Rect {
        self.tuning.bird_rect(self.bird.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_at_rest() {
        let state = SimulationState::new(Tuning::default());
        assert_eq!(state.bird, Bird { y: 300.0, vel: 0.0 });
        assert!(state.obstacles.is_empty());
        assert_eq!(state.ticks, 0);
        assert_eq!(state.score, 0);
        assert!(!state.is_over());
    }

    #[test]
    fn test_bird_rect_tracks_height() {
        let mut state = SimulationState::new(Tuning::default());
        state.bird.y = 120.0;
        assert_eq!(state.bird_rect(), Rect::new(50.0, 84.0, 120.0, 154.0));
    }
}
