use glam::Vec2;

use crate::api::{PhysicsEngine, ViewHost};
use crate::config::BridgeConfig;
use crate::simulation::Simulation;
use crate::tags::TagTable;
use crate::types::{BodyHandle, BridgeStats, ElementId, ElementTag};
use crate::world::SimulationWorld;

/// Whether draw passes advance the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// Binds the children of a [`ViewHost`] to bodies in a physics world.
///
/// The host forwards its callbacks: [`on_size_changed`](Self::on_size_changed)
/// and [`on_layout`](Self::on_layout) from layout, [`on_draw`](Self::on_draw)
/// from every render pass, [`on_start`](Self::on_start) and
/// [`on_stop`](Self::on_stop) from visibility changes, and
/// [`on_sensor_changed`](Self::on_sensor_changed) from tilt input. All of them
/// must arrive on the same thread.
pub struct PhysicsBridge<H: ViewHost, E: PhysicsEngine = SimulationWorld> {
    host: H,
    config: BridgeConfig,
    tags: TagTable,
    simulation: Option<Simulation<E>>,
    size: Vec2,
    worlds_built: u64,
}

impl<H: ViewHost, E: PhysicsEngine> PhysicsBridge<H, E> {
    pub fn new(host: H, config: BridgeConfig) -> Self {
        Self {
            host,
            config,
            tags: TagTable::new(),
            simulation: None,
            size: Vec2::ZERO,
            worlds_built: 0,
        }
    }

    // --- Host callbacks ----------------------------------------------------

    /// Record the container size. The world picks it up on the next layout.
    pub fn on_size_changed(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Make sure a world exists and every child has a body. `changed`
    /// recreates the bodies of children that already have one.
    pub fn on_layout(&mut self, changed: bool) {
        let resized = self
            .simulation
            .as_ref()
            .is_some_and(|sim| sim.size() != self.size);
        self.ensure_world(resized);
        self.sync_bodies(changed || resized);
    }

    /// One render pass: step, sync poses, ask for the next frame.
    /// Returns `false` when nothing was stepped.
    pub fn on_draw(&mut self) -> bool {
        if !self.config.enabled {
            return false;
        }
        let Some(sim) = self.simulation.as_mut() else {
            return false;
        };
        sim.step_and_sync(&mut self.host, &self.tags, &self.config);
        self.host.invalidate();
        true
    }

    pub fn on_start(&mut self) {
        self.set_enabled(true);
    }

    pub fn on_stop(&mut self) {
        self.set_enabled(false);
    }

    /// Throw away the world and every body, then lay out again from scratch.
    pub fn update(&mut self) {
        self.ensure_world(true);
        self.sync_bodies(true);
    }

    /// Tilt input: push every simulated child by `(x, y)`.
    pub fn on_sensor_changed(&mut self, x: f32, y: f32) {
        if let Some(sim) = self.simulation.as_mut() {
            sim.apply_impulse(&self.host, &self.tags, Vec2::new(x, y));
        }
    }

    // --- Lifecycle ---------------------------------------------------------

    /// Create the world if there is none. With `force_rebuild` an existing
    /// world is discarded along with every element binding.
    pub fn ensure_world(&mut self, force_rebuild: bool) -> &mut Simulation<E> {
        let serial = self.worlds_built + 1;
        let sim = match self.simulation.take() {
            None => Simulation::new(self.size, &self.config, serial),
            Some(sim) if force_rebuild => sim.reset(self.size, &self.config, &mut self.tags, serial),
            Some(sim) => sim,
        };
        if sim.serial() == serial {
            self.worlds_built = serial;
        }
        self.simulation.insert(sim)
    }

    /// Create bodies for unbound children (all children when
    /// `force_recreate`). Does nothing before the first layout.
    pub fn sync_bodies(&mut self, force_recreate: bool) -> usize {
        match self.simulation.as_mut() {
            Some(sim) => sim.sync_bodies(&self.host, &mut self.tags, &self.config, force_recreate),
            None => 0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled != enabled {
            tracing::debug!(enabled, "bridge run state changed");
        }
        self.config.enabled = enabled;
        self.host.invalidate();
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn run_state(&self) -> RunState {
        if self.config.enabled {
            RunState::Running
        } else {
            RunState::Stopped
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.simulation.is_some()
    }

    // --- Element tags ------------------------------------------------------

    /// Declare a child circular (or not). Takes effect when its body is next
    /// created.
    pub fn set_circular(&mut self, id: ElementId, is_circle: bool) {
        self.tags.set_circle(id, is_circle);
    }

    pub fn tag(&self, id: ElementId) -> ElementTag {
        self.tags.get(id)
    }

    pub fn body_of(&self, id: ElementId) -> Option<BodyHandle> {
        self.tags.body(id)
    }

    // --- Configuration -----------------------------------------------------

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn friction(&self) -> f32 {
        self.config.friction()
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.config.set_friction(friction);
    }

    pub fn density(&self) -> f32 {
        self.config.density()
    }

    pub fn set_density(&mut self, density: f32) {
        self.config.set_density(density);
    }

    pub fn restitution(&self) -> f32 {
        self.config.restitution()
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        self.config.set_restitution(restitution);
    }

    pub fn ratio(&self) -> f32 {
        self.config.ratio()
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.config.set_ratio(ratio);
    }

    pub fn meters_to_pixels(&self, meters: f32) -> f32 {
        self.config.units().meters_to_pixels(meters)
    }

    pub fn pixels_to_meters(&self, pixels: f32) -> f32 {
        self.config.units().pixels_to_meters(pixels)
    }

    // --- Accessors ---------------------------------------------------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn simulation(&self) -> Option<&Simulation<E>> {
        self.simulation.as_ref()
    }

    /// Counters of the live world; zeroed before the first layout.
    pub fn stats(&self) -> BridgeStats {
        self.simulation
            .as_ref()
            .map(|sim| sim.stats())
            .unwrap_or_default()
    }
}
