//! Idle/demo pilot
//!
//! Flaps whenever the bird sinks below the centre of the next gap. Good
//! enough to keep attract-mode and headless runs alive for a while.

use super::state::SimulationState;

/// Centre line the pilot steers toward
pub fn target_center(state: &SimulationState) -> f32 {
    let tuning = &state.tuning;
    state
        .obstacles
        .iter()
        .find(|o| o.trailing_edge() >= tuning.bird_x)
        .map(|o| o.gap_top + tuning.gap_size / 2.0)
        .unwrap_or(tuning.field_height / 2.0)
}

/// Whether to flap on the next tick
pub fn wants_impulse(state: &SimulationState) -> bool {
    let center = state.bird.y + state.tuning.bird_size / 2.0;
    center > target_center(state) && state.bird.vel >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::Obstacle;
    use crate::sim::obstacle::tests::ScriptedGaps;
    use crate::sim::tick::{TickInput, advance};
    use crate::tuning::Tuning;

    #[test]
    fn test_targets_mid_field_without_obstacles() {
        let state = SimulationState::new(Tuning::default());
        assert_eq!(target_center(&state), 355.5);
    }

    #[test]
    fn test_targets_first_unpassed_gap() {
        let mut state = SimulationState::new(Tuning::default());
        state.obstacles.push(Obstacle {
            x: -20.0,
            gap_top: 100.0,
            width: 60.0,
            passed: true,
        });
        state.obstacles.push(Obstacle {
            x: 200.0,
            gap_top: 300.0,
            width: 60.0,
            passed: false,
        });
        assert_eq!(target_center(&state), 390.0);
    }

    #[test]
    fn test_does_not_flap_while_rising() {
        let mut state = SimulationState::new(Tuning::default());
        state.bird.y = 500.0;
        state.bird.vel = -2.0;
        assert!(!wants_impulse(&state));
        state.bird.vel = 1.0;
        assert!(wants_impulse(&state));
    }

    #[test]
    fn test_clears_first_obstacle() {
        let mut state = SimulationState::new(Tuning::default());
        let mut gaps = ScriptedGaps::new(&[250, 250, 250]);
        for _ in 0..300 {
            let input = TickInput {
                impulse: wants_impulse(&state),
            };
            advance(&mut state, &input, &mut gaps);
        }
        assert!(!state.is_over());
        assert!(state.score >= 1);
    }
}
