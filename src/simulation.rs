use glam::Vec2;

use crate::api::{PhysicsEngine, ViewHost};
use crate::boundary::BoundaryLayout;
use crate::config::BridgeConfig;
use crate::tags::TagTable;
use crate::types::*;
use crate::units::rotation_degrees;

/// One live physics world: the engine, its four frame bodies and the
/// bookkeeping for element bodies created in it.
///
/// A `Simulation` never outlives the container geometry it was built for;
/// [`Simulation::reset`] consumes it and hands back a fresh one.
pub struct Simulation<E: PhysicsEngine> {
    world: E,
    serial: u64,
    size: Vec2,
    boundaries: [BodyHandle; 4],
    rng: fastrand::Rng,
    stats: BridgeStats,
}

impl<E: PhysicsEngine> Simulation<E> {
    /// Build a world for a `size` (pixels) container and frame it.
    pub fn new(size: Vec2, config: &BridgeConfig, serial: u64) -> Self {
        let mut world = E::new(&config.world_config());
        let layout = BoundaryLayout::new(
            size.x,
            size.y,
            config.boundary_thickness_px(),
            config.units(),
        );
        let boundaries = layout.build(&mut world, config.boundary_material);
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        tracing::debug!(
            serial,
            width = size.x,
            height = size.y,
            thickness = config.boundary_thickness_px(),
            "built simulation world"
        );
        Self {
            world,
            serial,
            size,
            boundaries,
            rng,
            stats: BridgeStats::default(),
        }
    }

    /// Discard this world and every element binding, then build a new one.
    pub fn reset(self, size: Vec2, config: &BridgeConfig, tags: &mut TagTable, serial: u64) -> Self {
        tracing::debug!(old = self.serial, new = serial, "resetting simulation world");
        tags.clear_bodies();
        drop(self);
        Self::new(size, config, serial)
    }

    // --- Body factory ------------------------------------------------------

    /// Give every element of `host` a body. Elements already bound keep
    /// theirs unless `force_recreate` is set, in which case the old body is
    /// removed first. Returns the number of bodies created.
    pub fn sync_bodies<H: ViewHost>(
        &mut self,
        host: &H,
        tags: &mut TagTable,
        config: &BridgeConfig,
        force_recreate: bool,
    ) -> usize {
        let children = host.children();
        for body in tags.release_missing(&children) {
            self.world.remove_body(body);
            self.stats.bodies_removed += 1;
        }

        let mut created = 0;
        for id in children {
            let Some(frame) = host.frame(id) else {
                continue;
            };
            let tag = tags.get(id);
            if tag.body.is_some() && !force_recreate {
                continue;
            }
            let body = self.create_element_body(&frame, tag.is_circle, config);
            if let Some(old) = tags.set_body(id, body) {
                self.world.remove_body(old);
                self.stats.bodies_removed += 1;
            }
            created += 1;
        }
        self.stats.bodies_created += created as u64;
        if created > 0 {
            tracing::debug!(created, force_recreate, "created element bodies");
        }
        created
    }

    fn create_element_body(
        &mut self,
        frame: &ElementFrame,
        is_circle: bool,
        config: &BridgeConfig,
    ) -> BodyHandle {
        let units = config.units();
        let shape = if is_circle {
            ShapeKind::Circle {
                radius: units.pixels_to_meters(frame.width / 2.0),
            }
        } else {
            ShapeKind::Box {
                half_extents: units.vec_to_meters(frame.half_size()),
            }
        };
        let velocity = Vec2::new(self.rng.f32(), self.rng.f32());
        let desc = BodyDesc::dynamic(shape, units.vec_to_meters(frame.center()), config.material())
            .with_velocity(velocity);
        self.world.create_body(&desc)
    }

    // --- Step and sync -----------------------------------------------------

    /// Advance one fixed step and copy every bound body's pose onto its
    /// element. Returns how many elements were moved.
    pub fn step_and_sync<H: ViewHost>(
        &mut self,
        host: &mut H,
        tags: &TagTable,
        config: &BridgeConfig,
    ) -> usize {
        self.world.step(
            config.dt,
            config.velocity_iterations,
            config.position_iterations,
        );
        self.stats.steps += 1;

        let units = config.units();
        let mut synced = 0;
        for id in host.children() {
            let Some(body) = tags.body(id) else {
                continue;
            };
            let (Some(pose), Some(frame)) = (self.world.pose(body), host.frame(id)) else {
                continue;
            };
            let center = units.vec_to_pixels(pose.position);
            let corner = center - frame.half_size();
            host.set_pose(id, corner.x, corner.y, rotation_degrees(pose.angle));
            synced += 1;
        }
        self.stats.last_synced = synced;
        tracing::trace!(step = self.stats.steps, synced, "synced element poses");
        synced
    }

    // --- Impulses ----------------------------------------------------------

    /// Kick every bound element body by `impulse`, waking it.
    pub fn apply_impulse<H: ViewHost>(&mut self, host: &H, tags: &TagTable, impulse: Vec2) -> usize {
        let mut applied = 0;
        for id in host.children() {
            if let Some(body) = tags.body(id) {
                self.world.apply_linear_impulse(body, impulse, true);
                applied += 1;
            }
        }
        self.stats.impulses_applied += applied as u64;
        applied
    }

    // --- Accessors ---------------------------------------------------------

    pub fn world(&self) -> &E {
        &self.world
    }

    /// Build number of this world; distinct for every rebuild.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Container size (pixels) the frame was built for.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn boundaries(&self) -> [BodyHandle; 4] {
        self.boundaries
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::HeadlessTree;
    use crate::world::SimulationWorld;

    fn seeded() -> BridgeConfig {
        let mut cfg = BridgeConfig::default();
        cfg.seed = Some(42);
        cfg
    }

    fn weightless() -> BridgeConfig {
        let mut cfg = seeded();
        cfg.gravity = Vec2::ZERO;
        cfg
    }

    fn tree() -> HeadlessTree {
        let mut t = HeadlessTree::new();
        t.insert(ElementId(1), ElementFrame::new(100.0, 100.0, 40.0, 40.0));
        t.insert(ElementId(2), ElementFrame::new(200.0, 50.0, 80.0, 30.0));
        t
    }

    fn sim(cfg: &BridgeConfig) -> Simulation<SimulationWorld> {
        Simulation::new(Vec2::new(400.0, 600.0), cfg, 1)
    }

    #[test]
    fn test_new_world_has_four_static_boundaries() {
        let s = sim(&seeded());
        assert_eq!(s.world().body_count(), 4);
        for b in s.boundaries() {
            assert_eq!(s.world().is_static(b), Some(true));
        }
    }

    #[test]
    fn test_circle_flag_selects_shape() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let host = tree();
        let mut tags = TagTable::new();
        tags.set_circle(ElementId(1), true);
        assert_eq!(s.sync_bodies(&host, &mut tags, &cfg, false), 2);

        let circle = tags.body(ElementId(1)).unwrap();
        let rect = tags.body(ElementId(2)).unwrap();
        assert_eq!(s.world().shape(circle), Some(ShapeKind::Circle { radius: 0.4 }));
        assert_eq!(
            s.world().shape(rect),
            Some(ShapeKind::Box { half_extents: Vec2::new(0.8, 0.3) })
        );
        assert_eq!(s.world().is_static(circle), Some(false));
    }

    #[test]
    fn test_bodies_start_at_element_center_with_unit_velocity() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let host = tree();
        let mut tags = TagTable::new();
        s.sync_bodies(&host, &mut tags, &cfg, false);

        let body = tags.body(ElementId(1)).unwrap();
        let pose = s.world().pose(body).unwrap();
        assert_eq!(pose.position, Vec2::new(2.4, 2.4));
        let vel = s.world().linear_velocity(body).unwrap();
        assert!((0.0..1.0).contains(&vel.x) && (0.0..1.0).contains(&vel.y));
    }

    #[test]
    fn test_sync_is_idempotent_without_force() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let host = tree();
        let mut tags = TagTable::new();
        s.sync_bodies(&host, &mut tags, &cfg, false);
        let first = tags.body(ElementId(1));
        assert_eq!(s.sync_bodies(&host, &mut tags, &cfg, false), 0);
        assert_eq!(tags.body(ElementId(1)), first);
        assert_eq!(s.world().body_count(), 6);
    }

    #[test]
    fn test_forced_recreate_replaces_bodies() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let host = tree();
        let mut tags = TagTable::new();
        s.sync_bodies(&host, &mut tags, &cfg, false);
        let first = tags.body(ElementId(1)).unwrap();
        assert_eq!(s.sync_bodies(&host, &mut tags, &cfg, true), 2);
        let second = tags.body(ElementId(1)).unwrap();
        assert_ne!(first, second);
        assert!(s.world().pose(first).is_none());
        assert_eq!(s.world().body_count(), 6);
        assert_eq!(s.stats().bodies_removed, 2);
    }

    #[test]
    fn test_removed_element_releases_body() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let mut host = tree();
        let mut tags = TagTable::new();
        s.sync_bodies(&host, &mut tags, &cfg, false);
        let gone = tags.body(ElementId(2)).unwrap();
        host.remove(ElementId(2));
        s.sync_bodies(&host, &mut tags, &cfg, false);
        assert!(tags.body(ElementId(2)).is_none());
        assert!(s.world().pose(gone).is_none());
        assert_eq!(s.world().body_count(), 5);
    }

    #[test]
    fn test_zero_size_element_is_accepted() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let mut host = HeadlessTree::new();
        host.insert(ElementId(5), ElementFrame::new(10.0, 10.0, 0.0, 0.0));
        let mut tags = TagTable::new();
        tags.set_circle(ElementId(5), true);
        assert_eq!(s.sync_bodies(&host, &mut tags, &cfg, false), 1);
        let body = tags.body(ElementId(5)).unwrap();
        assert_eq!(s.world().shape(body), Some(ShapeKind::Circle { radius: 0.0 }));
    }

    #[test]
    fn test_step_writes_pose_back_in_pixels() {
        let cfg = weightless();
        let mut s = sim(&cfg);
        let mut host = tree();
        let mut tags = TagTable::new();
        s.sync_bodies(&host, &mut tags, &cfg, false);

        assert_eq!(s.step_and_sync(&mut host, &tags, &cfg), 2);
        let body = tags.body(ElementId(2)).unwrap();
        let pose = s.world().pose(body).unwrap();
        let e = host.get(ElementId(2)).unwrap();
        approx::assert_relative_eq!(e.frame.x, pose.position.x * 50.0 - 40.0, epsilon = 1e-3);
        approx::assert_relative_eq!(e.frame.y, pose.position.y * 50.0 - 15.0, epsilon = 1e-3);
        assert!((0.0..360.0).contains(&e.rotation));
        assert_eq!(s.stats().steps, 1);
        assert_eq!(s.stats().last_synced, 2);
    }

    #[test]
    fn test_unbound_elements_are_skipped() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let mut host = tree();
        let tags = TagTable::new();
        let before = host.get(ElementId(1)).copied();
        assert_eq!(s.step_and_sync(&mut host, &tags, &cfg), 0);
        assert_eq!(host.get(ElementId(1)).copied(), before);
        assert_eq!(s.apply_impulse(&host, &tags, Vec2::X), 0);
    }

    #[test]
    fn test_impulse_reaches_every_bound_body() {
        let cfg = weightless();
        let mut s = sim(&cfg);
        let mut host = tree();
        let mut tags = TagTable::new();
        s.sync_bodies(&host, &mut tags, &cfg, false);

        let body = tags.body(ElementId(1)).unwrap();
        let vx = s.world().linear_velocity(body).unwrap().x;
        assert_eq!(s.apply_impulse(&host, &tags, Vec2::new(1.0, 0.0)), 2);
        s.step_and_sync(&mut host, &tags, &cfg);
        assert!(s.world().linear_velocity(body).unwrap().x > vx);
        assert_eq!(s.stats().impulses_applied, 2);
    }

    #[test]
    fn test_reset_drops_bindings_and_rebuilds() {
        let cfg = seeded();
        let mut s = sim(&cfg);
        let host = tree();
        let mut tags = TagTable::new();
        tags.set_circle(ElementId(1), true);
        s.sync_bodies(&host, &mut tags, &cfg, false);

        let s = s.reset(Vec2::new(400.0, 600.0), &cfg, &mut tags, 2);
        assert_eq!(s.serial(), 2);
        assert_eq!(tags.bound_count(), 0);
        assert!(tags.is_circle(ElementId(1)));
        assert_eq!(s.world().body_count(), 4);
        assert_eq!(s.stats(), BridgeStats::default());
    }
}
