//! Circular touch pad
//!
//! Touch coordinates arrive relative to the pad's bounding box; the pad's
//! center is at `(size / 2, size / 2)`. `size` tracks the rendered element,
//! so the dead-zone stays centered whatever the page's CSS does.

use glam::Vec2;

use crate::sim::Direction;

/// Emulator pad: ignore touches this close to the center
const HELD_INNER_RADIUS: f32 = 10.0;
/// Emulator pad: touches may drift this far outside the rim
const HELD_RIM_SLACK: f32 = 30.0;
/// Emulator pad: per-axis threshold for a held direction
const HELD_AXIS_THRESHOLD: f32 = 15.0;

/// A fixed-size circular control surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DPad {
    /// Diameter in pixels
    pub size: f32,
    /// Offset the dominant axis must exceed
    pub dead_zone: f32,
}

impl DPad {
    pub fn new(size: f32, dead_zone: f32) -> Self {
        Self { size, dead_zone }
    }

    /// Match the measured width of the pad element. Zero-sized (hidden)
    /// elements keep the previous size.
    pub fn resize(&mut self, size: f32) {
        if size > 0.0 {
            self.size = size;
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }

    /// Offset of a touch from the pad center
    pub fn offset(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) - self.center()
    }

    /// Single direction on the dominant axis, `None` inside the dead-zone.
    ///
    /// Ties between axes go to the vertical axis.
    pub fn classify(&self, x: f32, y: f32) -> Option<Direction> {
        let d = self.offset(x, y);
        if d.x.abs() > d.y.abs() {
            if d.x > self.dead_zone {
                Some(Direction::Right)
            } else if d.x < -self.dead_zone {
                Some(Direction::Left)
            } else {
                None
            }
        } else if d.y > self.dead_zone {
            Some(Direction::Down)
        } else if d.y < -self.dead_zone {
            Some(Direction::Up)
        } else {
            None
        }
    }

    /// All held directions (diagonals allowed) for the emulator pad.
    ///
    /// Empty when the touch is near the center or has slid off the pad.
    pub fn classify_held(&self, x: f32, y: f32) -> Vec<Direction> {
        let d = self.offset(x, y);
        let distance = d.length();
        let max_distance = self.size / 2.0 + HELD_RIM_SLACK;
        let mut held = Vec::with_capacity(2);
        if distance <= HELD_INNER_RADIUS || distance >= max_distance {
            return held;
        }
        if d.x.abs() > HELD_AXIS_THRESHOLD {
            held.push(if d.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            });
        }
        if d.y.abs() > HELD_AXIS_THRESHOLD {
            held.push(if d.y > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            });
        }
        held
    }
}
