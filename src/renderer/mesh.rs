//! Surface that tessellates into a triangle list
//!
//! Output is in screen pixels; the consumer maps to clip space with the viewport size.

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use super::{Layer, Surface};
use crate::QualityPreset;
use crate::sim::state::Rgba;

#[derive(Debug, Clone)]
pub struct MeshSurface {
    pub vertices: Vec<Vertex>,
    /// Color of the last `clear`, for the render pass load op
    pub clear_color: Option<Rgba>,
    circle_segments: u32,
    layer_starts: Vec<(Layer, usize)>,
}

impl MeshSurface {
    pub fn new(quality: QualityPreset) -> Self {
        Self {
            vertices: Vec::new(),
            clear_color: None,
            circle_segments: quality.circle_segments(),
            layer_starts: Vec::new(),
        }
    }

    /// Raw bytes ready for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// First vertex index of each layer, in draw order
    pub fn layer_starts(&self) -> &[(Layer, usize)] {
        &self.layer_starts
    }

    pub fn reset(&mut self) {
        self.vertices.clear();
        self.clear_color = None;
        self.layer_starts.clear();
    }
}

impl Surface for MeshSurface {
    fn begin_layer(&mut self, layer: Layer) {
        self.layer_starts.push((layer, self.vertices.len()));
    }

    fn clear(&mut self, color: Rgba) {
        self.vertices.clear();
        self.clear_color = Some(color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.vertices.extend(shapes::line(from, to, width, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.vertices
            .extend(shapes::circle(center, radius, color, self.circle_segments));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        let half = width * 0.5;
        self.vertices.extend(shapes::ring(
            center,
            radius - half,
            radius + half,
            color,
            self.circle_segments,
        ));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.vertices.extend(shapes::rect(min, size, color));
    }

    // Text is left to the host's overlay
    fn text(&mut self, _pos: Vec2, _text: &str, _size: f32, _color: Rgba) {}
}
