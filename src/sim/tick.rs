//! Fixed-step simulation tick
//!
//! Advances a round by exactly one step and reports what happened.

use serde::{Deserialize, Serialize};

use super::geometry::overlaps;
use super::obstacle::{GapSource, spawn};
use super::state::SimulationState;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Flap (key, alternate key or pointer; all coalesce here)
    pub impulse: bool,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// Bird left the field through the top or bottom
    OutOfBounds,
    /// Bird hit a barrier
    Collision,
}

/// Observable outcomes of a tick, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Score went up; carries the new total
    ScoreChanged(u32),
    /// Round is over; carries the final score
    RoundEnded { score: u32, cause: EndCause },
}

/// Advance the round by one tick
///
/// A finished round is left untouched and produces no events, so at most one
/// `RoundEnded` is ever emitted per state.
pub fn advance<G: GapSource + ?Sized>(
    state: &mut SimulationState,
    input: &TickInput,
    gaps: &mut G,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    if state.is_over() {
        return events;
    }
    let tuning = state.tuning;

    // Impulse overrides velocity, then gravity applies the same tick
    if input.impulse {
        state.bird.vel = tuning.impulse;
    }
    state.bird.vel += tuning.gravity;
    state.bird.y += state.bird.vel;

    state.ticks += 1;
    if state.ticks % tuning.spawn_interval == 0 {
        let obstacle = spawn(&tuning, gaps);
        log::debug!(
            "tick {}: obstacle spawned, gap top {}",
            state.ticks,
            obstacle.gap_top
        );
        state.obstacles.push(obstacle);
    }

    for obstacle in &mut state.obstacles {
        obstacle.x -= tuning.obstacle_speed;
        if !obstacle.passed && obstacle.trailing_edge() < tuning.bird_x {
            obstacle.passed = true;
            state.score += 1;
            events.push(SimEvent::ScoreChanged(state.score));
        }
    }

    state.obstacles.retain(|o| o.trailing_edge() >= 0.0);

    let bird = state.bird_rect();
    if bird.bottom > tuning.field_height || bird.top < 0.0 {
        end_round(state, &mut events, EndCause::OutOfBounds);
        return events;
    }

    let hit = state.obstacles.iter().any(|o| {
        overlaps(&bird, &o.top_barrier())
            || overlaps(
                &bird,
                &o.bottom_barrier(tuning.gap_size, tuning.field_height),
            )
    });
    if hit {
        end_round(state, &mut events, EndCause::Collision);
    }

    events
}

fn end_round(state: &mut SimulationState, events: &mut Vec<SimEvent>, cause: EndCause) {
    state.finish();
    log::info!(
        "Round ended at tick {} ({:?}), score {}",
        state.ticks,
        cause,
        state.score
    );
    events.push(SimEvent::RoundEnded {
        score: state.score,
        cause,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::tests::ScriptedGaps;
    use crate::sim::obstacle::{Obstacle, RandGapSource};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const IDLE: TickInput = TickInput { impulse: false };
    const FLAP: TickInput = TickInput { impulse: true };

    fn fresh() -> SimulationState {
        SimulationState::new(Tuning::default())
    }

    fn obstacle_at(x: f32, gap_top: f32) -> Obstacle {
        Obstacle {
            x,
            gap_top,
            width: 60.0,
            passed: false,
        }
    }

    #[test]
    fn test_first_tick_from_rest() {
        let mut state = fresh();
        let events = advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        assert!(events.is_empty());
        assert_eq!(state.bird.vel, 0.25);
        assert_eq!(state.bird.y, 300.25);
        assert_eq!(state.ticks, 1);
        assert_eq!(state.score, 0);
        assert!(!state.is_over());
    }

    #[test]
    fn test_impulse_sets_velocity_before_gravity() {
        let mut state = fresh();
        state.bird.vel = 4.0;
        advance(&mut state, &FLAP, &mut ScriptedGaps::new(&[]));
        assert_eq!(state.bird.vel, -5.5 + 0.25);
        assert_eq!(state.bird.y, 300.0 - 5.25);
    }

    #[test]
    fn test_impulse_while_rising_still_resets() {
        let mut state = fresh();
        state.bird.vel = -9.0;
        advance(&mut state, &FLAP, &mut ScriptedGaps::new(&[]));
        assert_eq!(state.bird.vel, -5.25);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut state = fresh();
        // Gaps at 250..430 leave the bird at y = 300 untouched
        let mut gaps = ScriptedGaps::new(&[250, 250, 250]);
        for tick in 1..=250u64 {
            // Keep the bird in the air without hitting anything
            state.bird.y = 300.0;
            state.bird.vel = 0.0;
            let before = state.obstacles.len();
            advance(&mut state, &IDLE, &mut gaps);
            let spawned = state.obstacles.len() > before;
            assert_eq!(spawned, tick % 100 == 0, "tick {tick}");
            if spawned {
                // Spawned at the right edge, then moved with the others
                let newest = state.obstacles.last().unwrap();
                assert_eq!(newest.x, 400.0 - 3.0);
                assert_eq!(newest.gap_top, 250.0);
            }
        }
        assert!(!state.is_over());
        assert_eq!(state.obstacles.len(), 2);
    }

    #[test]
    fn test_obstacle_scores_once_when_trailing_edge_crosses_bird() {
        let mut state = fresh();
        // Gap lines up with the bird so nothing collides
        state.obstacles.push(obstacle_at(-7.0, 250.0));
        let mut gaps = ScriptedGaps::new(&[]);

        // Trailing edge 53 -> 50, not yet past
        state.bird.vel = -0.25;
        let events = advance(&mut state, &IDLE, &mut gaps);
        assert!(events.is_empty());
        assert_eq!(state.score, 0);

        // Trailing edge 50 -> 47, passed
        state.bird.vel = -0.25;
        let events = advance(&mut state, &IDLE, &mut gaps);
        assert_eq!(events, vec![SimEvent::ScoreChanged(1)]);
        assert!(state.obstacles[0].passed);

        state.bird.vel = -0.25;
        let events = advance(&mut state, &IDLE, &mut gaps);
        assert!(events.is_empty());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_offscreen_obstacles_are_pruned() {
        let mut state = fresh();
        state.obstacles.push(obstacle_at(-62.0, 250.0));
        state.obstacles.push(obstacle_at(-50.0, 250.0));
        state.obstacles[0].passed = true;
        state.obstacles[1].passed = true;
        advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        // -65 + 60 < 0 goes, -53 + 60 stays
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, -53.0);
    }

    #[test]
    fn test_falling_out_of_the_floor_ends_round() {
        let mut state = fresh();
        state.bird.y = 711.0 - 34.0;
        let events = advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        assert_eq!(
            events,
            vec![SimEvent::RoundEnded {
                score: 0,
                cause: EndCause::OutOfBounds
            }]
        );
        assert!(state.is_over());
    }

    #[test]
    fn test_flying_through_the_ceiling_ends_round() {
        let mut state = fresh();
        state.bird.y = 2.0;
        let events = advance(&mut state, &FLAP, &mut ScriptedGaps::new(&[]));
        assert!(matches!(
            events.as_slice(),
            [SimEvent::RoundEnded {
                cause: EndCause::OutOfBounds,
                ..
            }]
        ));
    }

    #[test]
    fn test_touching_bottom_barrier_is_not_a_collision() {
        let mut state = fresh();
        // After this tick the obstacle sits at x = 40, overlapping the bird
        // horizontally. Gap 100..280; bird lands with bottom exactly at 280.
        state.obstacles.push(obstacle_at(43.0, 100.0));
        state.bird.y = 246.0 - 0.25;
        state.bird.vel = 0.0;
        let events = advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        assert_eq!(state.bird_rect().bottom, 280.0);
        assert!(events.is_empty());
        assert!(!state.is_over());
    }

    #[test]
    fn test_one_unit_into_bottom_barrier_is_a_collision() {
        let mut state = fresh();
        state.obstacles.push(obstacle_at(43.0, 100.0));
        state.bird.y = 247.0 - 0.25;
        state.bird.vel = 0.0;
        let events = advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        assert_eq!(state.bird_rect().bottom, 281.0);
        assert_eq!(
            events,
            vec![SimEvent::RoundEnded {
                score: 0,
                cause: EndCause::Collision
            }]
        );
    }

    #[test]
    fn test_top_barrier_collision() {
        let mut state = fresh();
        state.obstacles.push(obstacle_at(43.0, 400.0));
        let events = advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        assert!(matches!(
            events.as_slice(),
            [SimEvent::RoundEnded {
                cause: EndCause::Collision,
                ..
            }]
        ));
    }

    #[test]
    fn test_score_event_precedes_round_end_in_same_tick() {
        let mut state = fresh();
        let mut passing = obstacle_at(-7.0, 250.0);
        passing.x = -10.0 + 3.0 - 0.5;
        state.obstacles.push(passing);
        state.bird.y = 711.0 - 34.0;
        let events = advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        assert_eq!(
            events,
            vec![
                SimEvent::ScoreChanged(1),
                SimEvent::RoundEnded {
                    score: 1,
                    cause: EndCause::OutOfBounds
                }
            ]
        );
    }

    #[test]
    fn test_finished_round_does_not_advance() {
        let mut state = fresh();
        state.bird.y = 700.0;
        advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
        assert!(state.is_over());

        let snapshot = (state.bird, state.ticks, state.score);
        let events = advance(&mut state, &FLAP, &mut ScriptedGaps::new(&[]));
        assert!(events.is_empty());
        assert_eq!((state.bird, state.ticks, state.score), snapshot);
    }

    #[test]
    fn test_seeded_round_score_never_decreases() {
        let mut state = fresh();
        let mut gaps = RandGapSource::seeded(2024);
        let mut last_score = 0;
        let mut ended = 0;
        for _ in 0..5_000 {
            let input = TickInput {
                impulse: crate::sim::autopilot::wants_impulse(&state),
            };
            for event in advance(&mut state, &input, &mut gaps) {
                match event {
                    SimEvent::ScoreChanged(score) => {
                        assert_eq!(score, last_score + 1);
                        last_score = score;
                    }
                    SimEvent::RoundEnded { score, .. } => {
                        assert_eq!(score, last_score);
                        ended += 1;
                    }
                }
            }
        }
        assert!(ended <= 1);
    }

    proptest! {
        #[test]
        fn free_fall_integrates_gravity(y in 100.0f32..400.0, vel in -5.0f32..5.0) {
            let mut state = fresh();
            state.bird.y = y;
            state.bird.vel = vel;
            advance(&mut state, &IDLE, &mut ScriptedGaps::new(&[]));
            let expected_vel = vel + 0.25;
            prop_assert_eq!(state.bird.vel, expected_vel);
            prop_assert_eq!(state.bird.y, y + expected_vel);
        }
    }
}
