//! Shape generation for 2D primitives

use glam::Vec2;

use super::draw::{Color, DrawCmd, DrawList};
use super::vertex::Vertex;

/// Axis-aligned filled rectangle as two triangles
pub fn rect(pos: Vec2, size: Vec2, color: Color) -> [Vertex; 6] {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Thick line segment as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: Color) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    [
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Triangles for everything in the list except text, in paint order.
/// Positions stay in field pixels.
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(list.len() * 6);
    for (_, cmd) in list.ordered() {
        match cmd {
            DrawCmd::Clear(color) => {
                vertices.extend_from_slice(&rect(Vec2::ZERO, list.field, *color));
            }
            DrawCmd::FillRect { pos, size, color } => {
                if size.x > 0.0 && size.y > 0.0 {
                    vertices.extend_from_slice(&rect(*pos, *size, *color));
                }
            }
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => {
                vertices.extend_from_slice(&line(*from, *to, *width, *color));
            }
            // Text goes through the DOM overlay
            DrawCmd::Text { .. } => {}
        }
    }
    vertices
}
