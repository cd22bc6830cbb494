use std::time::Duration;

use particle_sandbox::*;

fn main() -> Result<()> {
    let startup = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|err| SandboxError::Config(format!("{path}: {err}")))?;
            StartupConfig::from_json_str(&text)?
        }
        None => StartupConfig::default(),
    };

    let mut simulation = Simulation::from_startup(startup)?;
    simulation.toggle_pause();
    simulation.toggle_collisions();
    simulation.toggle_vertical_gravity();
    simulation.enqueue(Command::SpawnTrack(TrackDesc {
        point_count: 17,
        spacing: 40.0,
        thickness: 4.0,
        y_min: 380.0,
        y_max: 440.0,
    }));
    simulation.enqueue(Command::SpawnVehicle {
        position: DVec2::new(120.0, 300.0),
        velocity: DVec2::new(2.0, 0.0),
        desc: VehicleDesc::default(),
        color: Color::new(200, 80, 40),
    });

    let frame = Duration::from_millis(16);
    for tick in 0..600 {
        if simulation.tick(frame) == StepOutcome::RequestExit {
            break;
        }
        if tick % 120 == 0 {
            let stats = simulation.stats();
            println!(
                "t = {:>7.2}  bodies = {:>4}  springs = {:>6}  fps = {}",
                stats.elapsed_time, stats.body_count, stats.spring_edge_count, stats.fps
            );
        }
    }

    simulation.cycle_collision_type();
    for _ in 0..120 {
        simulation.tick(frame);
    }
    println!("after merging: {} bodies", simulation.stats().body_count);
    Ok(())
}
