//! Rendering module
//!
//! `frame::render` describes a frame, `shapes` tessellates it and
//! `pipeline::RenderState` presents it through WebGPU.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::{Color, Fill, Frame, Shape, render};
pub use pipeline::RenderState;
pub use shapes::tessellate;
pub use vertex::Vertex;
