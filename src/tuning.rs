//! Data-driven game balance
//!
//! Every physics and layout constant in one serde-loadable struct. The
//! defaults mirror `crate::consts`; a JSON file may override any subset.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Rect;

/// Reasons a parameter set cannot drive a round
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("spawn interval must be at least one tick")]
    ZeroSpawnInterval,
    #[error(
        "no room for a gap: field height {field_height} < gap {gap_size} + 2 x min arm {min_arm}"
    )]
    NoGapRoom {
        field_height: f32,
        gap_size: f32,
        min_arm: f32,
    },
    #[error("bird start y {start_y} puts the bird outside a field of height {field_height}")]
    BirdOutsideField { start_y: f32, field_height: f32 },
    #[error("invalid tuning file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters for one round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,
    pub gravity: f32,
    pub impulse: f32,
    pub obstacle_speed: f32,
    pub spawn_interval: u64,
    pub obstacle_width: f32,
    pub gap_size: f32,
    pub min_arm: f32,
    pub bird_x: f32,
    pub bird_size: f32,
    pub bird_start_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            gravity: GRAVITY,
            impulse: IMPULSE,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_interval: SPAWN_INTERVAL_TICKS,
            obstacle_width: OBSTACLE_WIDTH,
            gap_size: GAP_SIZE,
            min_arm: MIN_ARM_HEIGHT,
            bird_x: BIRD_X,
            bird_size: BIRD_SIZE,
            bird_start_y: BIRD_START_Y,
        }
    }
}

impl Tuning {
    /// Parse a JSON parameter file and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject parameter sets that would make obstacle placement or the
    /// starting position impossible
    pub fn validate(&self) -> Result<(), TuningError> {
        let all = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("gravity", self.gravity),
            ("impulse", self.impulse),
            ("obstacle_speed", self.obstacle_speed),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("min_arm", self.min_arm),
            ("bird_x", self.bird_x),
            ("bird_size", self.bird_size),
            ("bird_start_y", self.bird_start_y),
        ];
        for (name, value) in all {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { name, value });
            }
        }

        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("obstacle_speed", self.obstacle_speed),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("bird_size", self.bird_size),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        if self.spawn_interval == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }

        // Gap tops are whole units, so the integer draw range must be non-empty too
        let range = self.gap_top_range();
        if self.min_arm < 0.0
            || self.field_height < self.gap_size + 2.0 * self.min_arm
            || range.start() > range.end()
        {
            return Err(TuningError::NoGapRoom {
                field_height: self.field_height,
                gap_size: self.gap_size,
                min_arm: self.min_arm,
            });
        }

        if self.bird_start_y < 0.0 || self.bird_start_y + self.bird_size > self.field_height {
            return Err(TuningError::BirdOutsideField {
                start_y: self.bird_start_y,
                field_height: self.field_height,
            });
        }

        Ok(())
    }

    /// Inclusive integer range a gap's top edge is drawn from
    pub fn gap_top_range(&self) -> RangeInclusive<u32> {
        let lo = self.min_arm.ceil() as u32;
        let hi = (self.field_height - self.gap_size - self.min_arm).floor() as u32;
        lo..=hi
    }

    /// Bird bounding box with its top edge at `y`
    pub fn bird_rect(&self, y: f32) -> Rect {
        Rect::from_xywh(self.bird_x, y, self.bird_size, self.bird_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.gap_top_range(), 50..=481);
    }

    #[test]
    fn test_gap_too_large_is_rejected() {
        let tuning = Tuning {
            gap_size: 650.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NoGapRoom { .. })
        ));
    }

    #[test]
    fn test_exactly_fitting_gap_is_allowed() {
        let tuning = Tuning {
            field_height: 280.0,
            gap_size: 180.0,
            min_arm: 50.0,
            bird_start_y: 100.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.gap_top_range(), 50..=50);
    }

    #[test]
    fn test_fractional_arm_without_whole_gap_top_is_rejected() {
        let tuning = Tuning {
            field_height: 280.9,
            gap_size: 180.0,
            min_arm: 50.4,
            bird_start_y: 100.0,
            ..Default::default()
        };
        assert_eq!(tuning.gap_top_range(), 51..=50);
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NoGapRoom { .. })
        ));
    }

    #[test]
    fn test_zero_spawn_interval_is_rejected() {
        let tuning = Tuning {
            spawn_interval: 0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::ZeroSpawnInterval)
        ));
    }

    #[test]
    fn test_nan_is_rejected() {
        let tuning = Tuning {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotFinite { name: "gravity", .. })
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "spawn_interval": 80 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.spawn_interval, 80);
        assert_eq!(tuning.gap_size, GAP_SIZE);
    }

    #[test]
    fn test_json_with_impossible_gap_fails_validation() {
        let err = Tuning::from_json(r#"{ "field_height": 200.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NoGapRoom { .. }));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = Tuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
