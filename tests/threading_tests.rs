use particle_sandbox::{SandboxWorld, Simulation, SimulationConfig, StartupConfig};
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn world_and_simulation_are_send_and_sync() {
    fn assert_sync_send<T: Sync + Send>() {}
    assert_sync_send::<SandboxWorld>();
    assert_sync_send::<Simulation>();
}

#[test]
fn shared_world_steps_across_threads() {
    let mut world = SandboxWorld::default();
    world.populate(20, 4.0).unwrap();
    world.config_mut().gravity_vertical_enabled = true;
    let world = Arc::new(Mutex::new(world));

    let mut handles = vec![];
    for _ in 0..4 {
        let world_clone = Arc::clone(&world);
        let handle = thread::spawn(move || {
            let mut world = world_clone.lock().unwrap();
            world.step(1.0 / 60.0);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
    let world = world.lock().unwrap();
    assert!((world.elapsed_time() - 4.0 / 60.0).abs() < 1e-12);
}

#[test]
fn parallel_and_sequential_steps_agree() {
    let startup = StartupConfig {
        number_of_objects: 64,
        seed: 9,
        simulation: SimulationConfig {
            gravity_radial_enabled: true,
            collisions_enabled: true,
            ..SimulationConfig::quiescent()
        },
        ..StartupConfig::default()
    };

    let mut sequential = Simulation::from_startup(startup.clone()).unwrap();
    let mut parallel = Simulation::from_startup(startup).unwrap();
    sequential.world_mut().set_parallel_enabled(false);
    parallel.world_mut().set_parallel_enabled(true);

    for _ in 0..10 {
        sequential.world_mut().step(1.0);
        parallel.world_mut().step(1.0);
    }

    let positions = |simulation: &Simulation| {
        simulation
            .world()
            .bodies()
            .map(|body| body.position())
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(&sequential), positions(&parallel));
}
