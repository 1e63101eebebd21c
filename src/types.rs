use glam::Vec2;

/// Host-assigned identifier of one visual element (e.g., a child view's id).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

/// Handle to a rigid body owned by the live simulation world.
///
/// Handles are only meaningful for the world that issued them; a rebuilt
/// world starts numbering again from zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub u32);

/// Collision shape of a body, in meters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// Centered circle.
    Circle { radius: f32 },
    /// Centered box (half extents along X/Y).
    Box { half_extents: Vec2 },
}

/// Whether the solver moves a body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static,
}

/// Surface scalars attached to a body's fixture.
#[derive(Copy, Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Material {
    pub friction: f32,
    pub density: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.3,
            density: 0.5,
            restitution: 0.3,
        }
    }
}

/// Everything the engine needs to create one body with a single fixture.
#[derive(Copy, Clone, Debug)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: ShapeKind,
    /// Center of the body in meters.
    pub position: Vec2,
    /// Initial linear velocity in meters per second.
    pub linear_velocity: Vec2,
    pub material: Material,
}

impl BodyDesc {
    pub fn dynamic(shape: ShapeKind, position: Vec2, material: Material) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            position,
            linear_velocity: Vec2::ZERO,
            material,
        }
    }

    pub fn fixed(shape: ShapeKind, position: Vec2, material: Material) -> Self {
        Self {
            kind: BodyKind::Static,
            shape,
            position,
            linear_velocity: Vec2::ZERO,
            material,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.linear_velocity = vel;
        self
    }
}

/// Position (meters) and angle (radians) of a body after a step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

/// Layout box of an element as reported by the host, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ElementFrame {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementFrame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Center of the box in pixels.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Side-table record kept per element: its body (if simulated) and its
/// declared shape flag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementTag {
    pub body: Option<BodyHandle>,
    pub is_circle: bool,
}

/// Engine construction parameters.
#[derive(Copy, Clone, Debug)]
pub struct WorldConfig {
    /// Gravity in m/s². Positive Y points down the screen.
    pub gravity: Vec2,
    /// Let resting bodies fall asleep.
    pub allow_sleep: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 9.8),
            allow_sleep: true,
        }
    }
}

/// Counters for the live simulation. Reset together with the world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub steps: u64,
    pub bodies_created: u64,
    pub bodies_removed: u64,
    pub impulses_applied: u64,
    /// Elements whose pose was written during the last tick.
    pub last_synced: usize,
}
