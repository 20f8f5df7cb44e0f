//! Simulation module
//!
//! All gameplay logic lives here. One call to `advance` is one tick:
//! - Fixed step, no wall-clock time
//! - Randomness only through an injected `GapSource`
//! - Obstacles iterate in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod geometry;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use geometry::{Rect, overlaps};
pub use obstacle::{GapSource, Obstacle, RandGapSource, spawn};
pub use state::{Bird, Phase, SimulationState};
pub use tick::{EndCause, SimEvent, TickInput, advance};
