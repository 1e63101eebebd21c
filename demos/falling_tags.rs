use tagfall::*;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tree = HeadlessTree::new();
    let labels = ["rust", "physics", "tags", "bounce", "gravity", "ui"];
    for (i, label) in labels.iter().enumerate() {
        let width = 24.0 + 12.0 * label.len() as f32;
        let x = 20.0 + (i % 3) as f32 * 110.0;
        let y = 20.0 + (i / 3) as f32 * 60.0;
        tree.insert(ElementId(i as u64), ElementFrame::new(x, y, width, 40.0));
    }

    let mut cfg = BridgeConfig::default();
    cfg.seed = Some(2024);
    let mut bridge: PhysicsBridge<HeadlessTree> = PhysicsBridge::new(tree, cfg);
    bridge.set_circular(ElementId(5), true);
    bridge.on_size_changed(360.0, 640.0);
    bridge.on_layout(false);

    for frame in 0..240 {
        if frame == 120 {
            // Tilt the device to the left.
            bridge.on_sensor_changed(-2.0, 0.0);
        }
        bridge.on_draw();
        if frame % 60 == 59 {
            println!("frame {}", frame + 1);
            for e in bridge.host().elements() {
                println!(
                    "  {:>8} x={:7.1} y={:7.1} rot={:6.1}",
                    labels[e.id.0 as usize], e.frame.x, e.frame.y, e.rotation
                );
            }
        }
    }

    let stats = bridge.stats();
    println!(
        "steps={} bodies={} impulses={} redraws={}",
        stats.steps,
        stats.bodies_created,
        stats.impulses_applied,
        bridge.host().invalidations()
    );
}
