//! Static frame around the container so element bodies stay on screen.

use glam::Vec2;

use crate::api::PhysicsEngine;
use crate::types::{BodyDesc, BodyHandle, Material, ShapeKind};
use crate::units::UnitConverter;

/// Which edge of the container a frame body guards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Center and half extents (meters) of one frame body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundaryBox {
    pub side: Side,
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl BoundaryBox {
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

/// The four boxes framing a `width` x `height` pixel container.
///
/// Each box is `2 * thickness` thick with its inner face on a container
/// edge. Top and bottom run past the corners so the frame has no gaps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundaryLayout {
    pub boxes: [BoundaryBox; 4],
}

impl BoundaryLayout {
    pub fn new(width: f32, height: f32, thickness_px: f32, units: UnitConverter) -> Self {
        let w = units.pixels_to_meters(width);
        let h = units.pixels_to_meters(height);
        let t = units.pixels_to_meters(thickness_px);

        let horizontal = Vec2::new(w / 2.0 + 2.0 * t, t);
        let vertical = Vec2::new(t, h / 2.0 + 2.0 * t);
        Self {
            boxes: [
                BoundaryBox {
                    side: Side::Top,
                    center: Vec2::new(w / 2.0, -t),
                    half_extents: horizontal,
                },
                BoundaryBox {
                    side: Side::Bottom,
                    center: Vec2::new(w / 2.0, h + t),
                    half_extents: horizontal,
                },
                BoundaryBox {
                    side: Side::Left,
                    center: Vec2::new(-t, h / 2.0),
                    half_extents: vertical,
                },
                BoundaryBox {
                    side: Side::Right,
                    center: Vec2::new(w + t, h / 2.0),
                    half_extents: vertical,
                },
            ],
        }
    }

    /// Insert the frame as static bodies, in `boxes` order.
    pub fn build<E: PhysicsEngine>(&self, world: &mut E, material: Material) -> [BodyHandle; 4] {
        self.boxes.map(|b| {
            world.create_body(&BodyDesc::fixed(
                ShapeKind::Box { half_extents: b.half_extents },
                b.center,
                material,
            ))
        })
    }
}
