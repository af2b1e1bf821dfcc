//! Vertex types for 2D mesh output

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Bytes per vertex in a packed buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::state::{Rgba, rgb};

    pub const BACKGROUND: Rgba = rgb(0x11, 0x18, 0x27);
    pub const GRID: Rgba = rgb(0x1f, 0x29, 0x37);
    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

    pub const PLAYER: Rgba = WHITE;
    pub const PLAYER_HURT: Rgba = rgb(0xff, 0xaa, 0xaa);
    pub const PICKUP_RING: Rgba = [1.0, 1.0, 1.0, 0.1];

    pub const HEAD_OUTLINE: Rgba = rgb(0xff, 0x00, 0x00);
    pub const HP_BAR_BACK: Rgba = rgb(0xef, 0x44, 0x44);
    pub const HP_BAR_FILL: Rgba = rgb(0x22, 0xc5, 0x5e);

    pub const GEM_SMALL: Rgba = rgb(0x4a, 0xde, 0x80);
    pub const GEM_MEDIUM: Rgba = rgb(0x3b, 0x82, 0xf6);
    pub const GEM_LARGE: Rgba = rgb(0xef, 0x44, 0x44);

    pub const DAMAGE_TEXT: Rgba = WHITE;
    pub const CRIT_TEXT: Rgba = rgb(0xff, 0xcc, 0x00);

    pub const WAND_BOLT: Rgba = rgb(0x60, 0xa5, 0xfa);
    pub const ARC_BOLT: Rgba = rgb(0xa7, 0x8b, 0xfa);
    pub const ARC_BOLT_EDGE: Rgba = rgb(0xe9, 0xd5, 0xff);
    pub const GARLIC_FILL: Rgba = [1.0, 1.0, 1.0, 0.1];
    pub const SATELLITE: Rgba = rgb(0xf4, 0x72, 0xb6);
    pub const RESONANCE_TEXT: Rgba = rgb(0xf9, 0xa8, 0xd4);
    pub const POOL_FILL: Rgba = [0.133, 0.773, 0.369, 0.18];
    pub const POOL_EDGE: Rgba = [0.133, 0.773, 0.369, 0.55];
    pub const BLOOM_FILL: Rgba = [0.063, 0.725, 0.506, 0.14];
    pub const BLOOM_EDGE: Rgba = [0.063, 0.725, 0.506, 0.45];
    pub const MAGNET_RING: Rgba = rgb(0x38, 0xbd, 0xf8);
    pub const SHIELD_RING: Rgba = [0.576, 0.773, 0.992, 0.9];
    pub const DILATION_RING: Rgba = [0.490, 0.827, 0.988, 0.4];

    /// Same color with alpha scaled by `factor`
    pub fn fade(color: Rgba, factor: f32) -> Rgba {
        [color[0], color[1], color[2], color[3] * factor.clamp(0.0, 1.0)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_packed() {
        assert_eq!(Vertex::STRIDE, 24);
        assert_eq!(Vertex::COLOR_OFFSET, 8);
        let verts = [Vertex::new(1.0, 2.0, colors::WHITE); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 2 * Vertex::STRIDE);
    }

    #[test]
    fn test_fade_scales_alpha_only() {
        let faded = colors::fade(colors::GEM_MEDIUM, 0.5);
        assert_eq!(faded[..3], colors::GEM_MEDIUM[..3]);
        assert_eq!(faded[3], 0.5);
    }
}
