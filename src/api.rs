use glam::Vec2;

use crate::types::*;

/// Contract for the rigid-body engine the bridge drives. The solver itself
/// (broadphase, contacts, sleeping) lives entirely behind this trait.
pub trait PhysicsEngine {
    /// Construct an empty world with the given gravity and sleep policy.
    fn new(cfg: &WorldConfig) -> Self
    where
        Self: Sized;

    // --- Bodies ------------------------------------------------------------

    /// Create a body with a single fixture and return its handle.
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Remove a body and its fixture. Unknown handles are ignored.
    fn remove_body(&mut self, body: BodyHandle);

    /// Number of live bodies, boundaries included.
    fn body_count(&self) -> usize;

    // --- Simulation --------------------------------------------------------

    /// Advance the world by `dt` seconds.
    fn step(&mut self, dt: f32, velocity_iterations: usize, position_iterations: usize);

    /// Apply a linear impulse at the body's center of mass.
    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2, wake: bool);

    // --- Queries -----------------------------------------------------------

    /// Current position (meters) and angle (radians).
    fn pose(&self, body: BodyHandle) -> Option<Pose>;

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;

    /// `Some(true)` for bodies the solver never moves.
    fn is_static(&self, body: BodyHandle) -> Option<bool>;

    /// Shape of the body's fixture.
    fn shape(&self, body: BodyHandle) -> Option<ShapeKind>;
}

/// Contract for the view tree that owns the visual elements.
pub trait ViewHost {
    /// Current children, in drawing order.
    fn children(&self) -> Vec<ElementId>;

    /// Layout box of a child; `None` if it is gone.
    fn frame(&self, id: ElementId) -> Option<ElementFrame>;

    /// Move a child: top-left corner in pixels, rotation in degrees.
    fn set_pose(&mut self, id: ElementId, x: f32, y: f32, rotation: f32);

    /// Ask the host to schedule another draw pass.
    fn invalidate(&mut self);
}
