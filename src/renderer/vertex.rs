//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` to RGBA with the given alpha
pub const fn rgb(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::rgb;

    // Snake
    pub const GRID_BACKGROUND: [f32; 4] = rgb(0x0f172a, 1.0);
    pub const GRID_LINE: [f32; 4] = rgb(0xffffff, 0.03);
    pub const FOOD: [f32; 4] = rgb(0xef4444, 1.0);
    pub const OBSTACLE: [f32; 4] = rgb(0x9ca3af, 1.0);
    pub const SNAKE_HEAD: [f32; 4] = rgb(0x10b981, 1.0);
    pub const SNAKE_BODY: [f32; 4] = rgb(0x34d399, 1.0);

    // Flappy
    pub const SKY: [f32; 4] = rgb(0x0ea5e9, 1.0);
    pub const PIPE: [f32; 4] = rgb(0x22c55e, 1.0);
    pub const FLAPPY_ACTOR: [f32; 4] = rgb(0xfacc15, 1.0);

    pub const TEXT: [f32; 4] = rgb(0xffffff, 1.0);
    pub const GAME_OVER_TEXT: [f32; 4] = rgb(0xfca5a5, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb() {
        assert_eq!(rgb(0xff0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x000000, 0.5), [0.0, 0.0, 0.0, 0.5]);
    }
}
