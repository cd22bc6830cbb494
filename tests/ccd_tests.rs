use particle_sandbox::{collision::swept_circle_time_of_impact, *};

fn make_world() -> SandboxWorld {
    let config = SimulationConfig {
        collisions_enabled: true,
        ..SimulationConfig::quiescent()
    };
    SandboxWorld::new(WorldBounds::default(), config, 1)
}

#[test]
fn fast_disc_does_not_tunnel_through_track() {
    let mut world = make_world();
    world.add_track(10, 80.0, 2.0, 300.0, 300.0).unwrap();
    let ball = world
        .add_ball(100.0, 250.0, 3.0, 0.0, 200.0, Color::WHITE, true)
        .unwrap();

    world.step(1.0);

    let body = world.body(ball).unwrap();
    assert!(body.velocity().y < 0.0, "ball should bounce, v = {}", body.velocity());
    assert!(body.position().y < 300.0, "ball tunnelled to {}", body.position());
}

#[test]
fn fast_disc_hits_static_disc() {
    let mut world = make_world();
    let post = world
        .add_ball(300.0, 200.0, 10.0, 0.0, 0.0, Color::WHITE, false)
        .unwrap();
    let bullet = world
        .add_ball(250.0, 200.0, 5.0, 100.0, 0.0, Color::WHITE, true)
        .unwrap();

    world.step(1.0);

    assert!(world.body(bullet).unwrap().position().x < 300.0);
    assert!(world.body(bullet).unwrap().velocity().x < 0.0);
    assert_eq!(world.body(post).unwrap().position(), DVec2::new(300.0, 200.0));
}

#[test]
fn swept_test_reports_first_touch() {
    let t = swept_circle_time_of_impact(DVec2::new(100.0, 0.0), DVec2::new(-100.0, 0.0), 10.0, 1.0)
        .expect("approaching circles meet");
    assert!((t - 0.9).abs() < 1e-12);
    assert!(swept_circle_time_of_impact(DVec2::new(100.0, 0.0), DVec2::new(50.0, 0.0), 10.0, 1.0).is_none());
}
