use std::collections::BTreeMap;

use proptest::prelude::*;
use tagfall::*;

/// Host that records every pose write, keyed by element.
#[derive(Default)]
struct RecordingHost {
    frames: BTreeMap<ElementId, ElementFrame>,
    writes: Vec<(ElementId, f32, f32, f32)>,
    redraws: usize,
}

impl RecordingHost {
    fn with_cards(n: u64) -> Self {
        let mut host = Self::default();
        for i in 0..n {
            let x = 30.0 + i as f32 * 70.0;
            host.frames
                .insert(ElementId(i), ElementFrame::new(x, 30.0, 50.0, 50.0));
        }
        host
    }
}

impl ViewHost for RecordingHost {
    fn children(&self) -> Vec<ElementId> {
        self.frames.keys().copied().collect()
    }

    fn frame(&self, id: ElementId) -> Option<ElementFrame> {
        self.frames.get(&id).copied()
    }

    fn set_pose(&mut self, id: ElementId, x: f32, y: f32, rotation: f32) {
        if let Some(f) = self.frames.get_mut(&id) {
            f.x = x;
            f.y = y;
        }
        self.writes.push((id, x, y, rotation));
    }

    fn invalidate(&mut self) {
        self.redraws += 1;
    }
}

fn bridge(n: u64) -> PhysicsBridge<RecordingHost> {
    let mut cfg = BridgeConfig::default();
    cfg.seed = Some(11);
    let mut b = PhysicsBridge::new(RecordingHost::with_cards(n), cfg);
    b.on_size_changed(400.0, 400.0);
    b
}

#[test]
fn cards_settle_inside_the_frame() {
    let mut b = bridge(4);
    b.on_layout(false);
    for _ in 0..600 {
        b.on_draw();
    }
    for (id, f) in &b.host().frames {
        let cx = f.x + f.width / 2.0;
        let cy = f.y + f.height / 2.0;
        assert!(
            (0.0..=400.0).contains(&cx) && (0.0..=400.0).contains(&cy),
            "{:?} escaped: ({}, {})",
            id,
            cx,
            cy
        );
    }
    // Settled cards rest on the floor half.
    assert!(b.host().frames.values().all(|f| f.y > 200.0));
}

#[test]
fn every_draw_writes_each_bound_card_once() {
    let mut b = bridge(3);
    b.on_layout(false);
    b.on_draw();
    assert_eq!(b.host().writes.len(), 3);
    assert!(b.host().writes.iter().all(|w| (0.0..360.0).contains(&w.3)));

    // A card added after layout is not simulated until the next layout.
    b.host_mut()
        .frames
        .insert(ElementId(9), ElementFrame::new(300.0, 30.0, 20.0, 20.0));
    b.on_draw();
    assert_eq!(b.host().writes.len(), 6);
    b.on_layout(false);
    b.on_draw();
    assert_eq!(b.host().writes.len(), 10);
}

#[test]
fn stop_start_cycle() {
    let mut b = bridge(2);
    b.on_layout(false);
    b.on_stop();
    let redraws = b.host().redraws;
    for _ in 0..10 {
        b.on_draw();
    }
    assert!(b.host().writes.is_empty());
    assert_eq!(b.host().redraws, redraws);

    b.on_start();
    b.on_draw();
    assert_eq!(b.host().writes.len(), 2);
}

#[test]
fn tilt_pushes_cards_sideways() {
    let mut cfg = BridgeConfig::default();
    cfg.seed = Some(5);
    cfg.gravity = glam::Vec2::ZERO;
    let mut b: PhysicsBridge<RecordingHost> = PhysicsBridge::new(RecordingHost::with_cards(1), cfg);
    b.on_size_changed(400.0, 400.0);
    b.on_layout(false);

    let body = b.body_of(ElementId(0)).unwrap();
    let before = b.simulation().unwrap().world().linear_velocity(body).unwrap();
    b.on_sensor_changed(1.0, 0.0);
    b.on_draw();
    let after = b.simulation().unwrap().world().linear_velocity(body).unwrap();
    assert!(after.x > before.x);
}

#[test]
fn config_from_toml_drives_bridge() {
    let cfg = BridgeConfig::from_toml_str(
        r#"
        ratio = 100.0
        enabled = false
        seed = 1
        "#,
    )
    .unwrap();
    let mut b: PhysicsBridge<RecordingHost> = PhysicsBridge::new(RecordingHost::with_cards(1), cfg);
    assert_eq!(b.run_state(), RunState::Stopped);
    b.on_size_changed(400.0, 400.0);
    b.on_layout(false);
    assert!(!b.on_draw());

    let body = b.body_of(ElementId(0)).unwrap();
    let shape = b.simulation().unwrap().world().shape(body);
    assert_eq!(
        shape,
        Some(ShapeKind::Box { half_extents: glam::Vec2::new(0.25, 0.25) })
    );
}

proptest! {
    #[test]
    fn negative_settings_never_stick(v in -1.0e6f32..-1.0e-6) {
        let mut cfg = BridgeConfig::default();
        let before = cfg.clone();
        cfg.set_friction(v);
        cfg.set_density(v);
        cfg.set_restitution(v);
        cfg.set_ratio(v);
        prop_assert_eq!(cfg, before);
    }
}
