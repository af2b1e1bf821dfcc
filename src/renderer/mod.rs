//! Render boundary
//!
//! Drawing never feeds back into the simulation. A frame is painted onto any
//! [`Surface`] in a fixed layer order; `RecordingSurface` captures the calls and
//! `MeshSurface` tessellates them into GPU-ready vertices.

pub mod mesh;
pub mod record;
pub mod scene;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::sim::state::Rgba;

pub use mesh::MeshSurface;
pub use record::{DrawCommand, RecordingSurface};
pub use scene::draw_frame;
pub use vertex::Vertex;

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Grid,
    Gems,
    Enemies,
    Weapons,
    Player,
    Particles,
    DamageNumbers,
}

impl Layer {
    pub const ORDER: [Layer; 8] = [
        Layer::Background,
        Layer::Grid,
        Layer::Gems,
        Layer::Enemies,
        Layer::Weapons,
        Layer::Player,
        Layer::Particles,
        Layer::DamageNumbers,
    ];
}

/// A 2D drawing target in screen pixels
pub trait Surface {
    /// Marks the start of a layer; targets that don't care ignore it
    fn begin_layer(&mut self, _layer: Layer) {}

    fn clear(&mut self, color: Rgba);

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Rgba);
}
