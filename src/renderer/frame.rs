//! Frame description
//!
//! `render` turns a simulation snapshot into a list of shapes in field
//! coordinates. It never touches the state and knows nothing about input
//! or the GPU; `shapes` and `pipeline` take it from there.

use glam::Vec2;

use crate::consts::{
    BIRD_CORNER_RADIUS, CAP_HEIGHT, CAP_OVERHANG, GRID_SPACING, MAX_TILT, TILT_PER_VELOCITY,
};
use crate::sim::{Obstacle, Phase, Rect, SimulationState};

/// Linear RGBA
pub type Color = [f32; 4];

/// Colours for game elements
pub mod palette {
    use super::Color;

    /// sRGB hex to linear RGBA
    pub const fn hex(rgb: u32) -> Color {
        [
            srgb_to_linear(((rgb >> 16) & 0xff) as f32 / 255.0),
            srgb_to_linear(((rgb >> 8) & 0xff) as f32 / 255.0),
            srgb_to_linear((rgb & 0xff) as f32 / 255.0),
            1.0,
        ]
    }

    // Cheap gamma-2.2 approximation, usable in const context
    const fn srgb_to_linear(c: f32) -> f32 {
        c * c * (0.8 * c + 0.2)
    }

    pub const BACKGROUND: Color = hex(0x0f172a);
    pub const GRID: Color = hex(0x1e293b);
    pub const OBSTACLE_EDGE: Color = hex(0x059669);
    pub const OBSTACLE_CENTER: Color = hex(0x10b981);
    pub const OBSTACLE_CAP: Color = hex(0x064e3b);
    pub const BIRD: Color = hex(0xfbbf24);
    pub const BIRD_EYE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BIRD_PUPIL: Color = [0.0, 0.0, 0.0, 1.0];
    pub const BIRD_WING: Color = hex(0xd97706);
}

/// How a rectangle is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Horizontal gradient: edge colour at both sides, centre colour mid-way
    Banded { edge: Color, center: Color },
}

/// A drawable primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        rect: Rect,
        fill: Fill,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    RoundedSquare {
        center: Vec2,
        size: f32,
        corner_radius: f32,
        /// Radians, clockwise on screen (y points down)
        rotation: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        color: Color,
    },
}

/// Everything needed to draw one frame, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: Vec2,
    pub clear: Color,
    pub shapes: Vec<Shape>,
}

impl Frame {
    /// Rotation of the bird body, if one was drawn
    pub fn bird_rotation(&self) -> Option<f32> {
        self.shapes.iter().find_map(|s| match s {
            Shape::RoundedSquare { rotation, .. } => Some(*rotation),
            _ => None,
        })
    }

    /// Number of filled rectangles (obstacle bodies and caps)
    pub fn rect_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Rect { .. }))
            .count()
    }
}

/// Bird tilt for a given vertical velocity
pub fn tilt(vel: f32) -> f32 {
    (vel * TILT_PER_VELOCITY).clamp(-MAX_TILT, MAX_TILT)
}

/// Build the frame for the current phase
pub fn render(state: &SimulationState, phase: Phase) -> Frame {
    let tuning = &state.tuning;
    let size = Vec2::new(tuning.field_width, tuning.field_height);
    let mut shapes = Vec::with_capacity(64);

    grid(size, &mut shapes);

    match phase {
        Phase::Menu => {
            bird(state, tuning.bird_start_y, 0.0, &mut shapes);
        }
        Phase::Playing | Phase::GameOver => {
            for obstacle in &state.obstacles {
                obstacle_shapes(state, obstacle, &mut shapes);
            }
            let rotation = if phase == Phase::Playing {
                tilt(state.bird.vel)
            } else {
                0.0
            };
            bird(state, state.bird.y, rotation, &mut shapes);
        }
    }

    Frame {
        size,
        clear: palette::BACKGROUND,
        shapes,
    }
}

fn grid(size: Vec2, shapes: &mut Vec<Shape>) {
    let mut x = 0.0;
    while x < size.x {
        shapes.push(Shape::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, size.y),
            width: 1.0,
            color: palette::GRID,
        });
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < size.y {
        shapes.push(Shape::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(size.x, y),
            width: 1.0,
            color: palette::GRID,
        });
        y += GRID_SPACING;
    }
}

fn obstacle_shapes(state: &SimulationState, obstacle: &Obstacle, shapes: &mut Vec<Shape>) {
    let tuning = &state.tuning;
    let body = Fill::Banded {
        edge: palette::OBSTACLE_EDGE,
        center: palette::OBSTACLE_CENTER,
    };
    let bottom = obstacle.bottom_barrier(tuning.gap_size, tuning.field_height);

    shapes.push(Shape::Rect {
        rect: obstacle.top_barrier(),
        fill: body,
    });
    shapes.push(Shape::Rect {
        rect: bottom,
        fill: body,
    });

    // Caps flare out over both barrier mouths
    let cap_x = obstacle.x - CAP_OVERHANG;
    let cap_w = obstacle.width + 2.0 * CAP_OVERHANG;
    shapes.push(Shape::Rect {
        rect: Rect::from_xywh(cap_x, obstacle.gap_top - CAP_HEIGHT, cap_w, CAP_HEIGHT),
        fill: Fill::Solid(palette::OBSTACLE_CAP),
    });
    shapes.push(Shape::Rect {
        rect: Rect::from_xywh(cap_x, bottom.top, cap_w, CAP_HEIGHT),
        fill: Fill::Solid(palette::OBSTACLE_CAP),
    });
}

fn bird(state: &SimulationState, y: f32, rotation: f32, shapes: &mut Vec<Shape>) {
    let size = state.tuning.bird_size;
    let center = Vec2::new(state.tuning.bird_x + size / 2.0, y + size / 2.0);
    // Bird-local offsets turn with the body
    let turn = Vec2::from_angle(rotation);
    let local = |x: f32, y: f32| center + turn.rotate(Vec2::new(x, y));

    shapes.push(Shape::RoundedSquare {
        center,
        size,
        corner_radius: BIRD_CORNER_RADIUS,
        rotation,
        color: palette::BIRD,
    });
    shapes.push(Shape::Circle {
        center: local(size / 4.0, -size / 6.0),
        radius: 5.0,
        color: palette::BIRD_EYE,
    });
    shapes.push(Shape::Circle {
        center: local(size / 4.0 + 2.0, -size / 6.0),
        radius: 2.0,
        color: palette::BIRD_PUPIL,
    });
    // Wing stays level while the body tilts
    shapes.push(Shape::Ellipse {
        center: local(-size / 4.0, size / 8.0),
        radii: Vec2::new(10.0, 6.0),
        rotation: 0.0,
        color: palette::BIRD_WING,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn state_with_obstacle() -> SimulationState {
        let mut state = SimulationState::new(Tuning::default());
        state.bird.y = 120.0;
        state.bird.vel = 3.0;
        state.obstacles.push(Obstacle {
            x: 200.0,
            gap_top: 150.0,
            width: 60.0,
            passed: false,
        });
        state
    }

    fn bird_center(frame: &Frame) -> Vec2 {
        frame
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::RoundedSquare { center, .. } => Some(*center),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_grid_every_forty_units() {
        let frame = render(&SimulationState::new(Tuning::default()), Phase::Menu);
        let lines = frame
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Line { .. }))
            .count();
        // 10 vertical (0..400), 18 horizontal (0..711)
        assert_eq!(lines, 10 + 18);
    }

    #[test]
    fn test_menu_shows_idle_bird_only() {
        let frame = render(&state_with_obstacle(), Phase::Menu);
        assert_eq!(frame.rect_count(), 0);
        assert_eq!(frame.bird_rotation(), Some(0.0));
        assert_eq!(bird_center(&frame), Vec2::new(67.0, 317.0));
    }

    #[test]
    fn test_playing_draws_obstacles_and_tilted_bird() {
        let state = state_with_obstacle();
        let frame = render(&state, Phase::Playing);
        // Two barriers and two caps
        assert_eq!(frame.rect_count(), 4);
        assert!((frame.bird_rotation().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(bird_center(&frame), Vec2::new(67.0, 137.0));
    }

    #[test]
    fn test_tilt_is_clamped() {
        assert_eq!(tilt(100.0), MAX_TILT);
        assert_eq!(tilt(-100.0), -MAX_TILT);
        assert_eq!(tilt(0.0), 0.0);
    }

    #[test]
    fn test_game_over_keeps_scene_but_levels_bird() {
        let frame = render(&state_with_obstacle(), Phase::GameOver);
        assert_eq!(frame.rect_count(), 4);
        assert_eq!(frame.bird_rotation(), Some(0.0));
    }

    #[test]
    fn test_caps_overhang_barrier_mouths() {
        let frame = render(&state_with_obstacle(), Phase::Playing);
        let rects: Vec<Rect> = frame
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect {
                    rect,
                    fill: Fill::Solid(_),
                } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(
            rects,
            vec![
                Rect::new(198.0, 262.0, 135.0, 150.0),
                Rect::new(198.0, 262.0, 330.0, 345.0),
            ]
        );
    }

    #[test]
    fn test_render_leaves_state_untouched() {
        let state = state_with_obstacle();
        let before = format!("{state:?}");
        let _ = render(&state, Phase::Playing);
        assert_eq!(format!("{state:?}"), before);
    }
}
