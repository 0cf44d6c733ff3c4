//! Collision tests for both games
//!
//! Grid collisions are exact cell equality. The side-scroller uses strict
//! axis-aligned box overlap: boxes that only touch along an edge don't hit.

use glam::{IVec2, Vec2};

use crate::spans_overlap;

/// Axis-aligned bounding box in field pixels (+y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from top-left corner and size
    pub fn from_corner(corner: Vec2, size: Vec2) -> Self {
        Self::new(corner, corner + size)
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        spans_overlap(self.min.x, self.max.x, other.min.x, other.max.x)
            && spans_overlap(self.min.y, self.max.y, other.min.y, other.max.y)
    }
}

/// The two solid regions of a pipe: above the gap and below it
pub fn pipe_solids(x: f32, width: f32, top: f32, gap: f32, field_height: f32) -> [Aabb; 2] {
    [
        Aabb::new(Vec2::new(x, 0.0), Vec2::new(x + width, top)),
        Aabb::new(Vec2::new(x, top + gap), Vec2::new(x + width, field_height)),
    ]
}

/// Which solid region of a pipe the actor overlaps, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeHit {
    Top,
    Bottom,
}

/// Test an actor box against one pipe
pub fn actor_pipe_collision(
    actor: &Aabb,
    x: f32,
    width: f32,
    top: f32,
    gap: f32,
    field_height: f32,
) -> Option<PipeHit> {
    let [upper, lower] = pipe_solids(x, width, top, gap, field_height);
    if actor.overlaps(&upper) {
        Some(PipeHit::Top)
    } else if actor.overlaps(&lower) {
        Some(PipeHit::Bottom)
    } else {
        None
    }
}

/// Above the ceiling or with the bottom edge past the floor
pub fn actor_out_of_bounds(actor: &Aabb, field_height: f32) -> bool {
    actor.min.y < 0.0 || actor.max.y > field_height
}

/// Exact cell membership
pub fn cell_occupied<'a>(mut cells: impl Iterator<Item = &'a IVec2>, cell: IVec2) -> bool {
    cells.any(|c| *c == cell)
}
