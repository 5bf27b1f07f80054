//! Lenia CLI - Run headless simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use lenia::{
    compute::{Lenia, SimulationStats},
    schema::{MU_RANGE, RADIUS_RANGE, SIGMA_RANGE, SimulationConfig, TIMESTEP_RANGE},
    snapshot::{CompressionType, WorldSnapshot},
};

/// Frames run by `--smoke-test` before exiting.
const SMOKE_TEST_FRAMES: u64 = 11;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => {
            print_example_config();
            return;
        }
        "--smoke-test" => {
            smoke_test();
            return;
        }
        _ => {}
    }

    let config_path = PathBuf::from(&args[1]);
    let mut steps: u64 = 100;
    let mut output: Option<PathBuf> = None;

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--output" {
            let Some(path) = rest.next() else {
                eprintln!("--output needs a file path");
                std::process::exit(1);
            };
            output = Some(PathBuf::from(path));
        } else {
            steps = arg.parse().unwrap_or_else(|_| {
                eprintln!("Invalid step count: {}", arg);
                std::process::exit(1);
            });
        }
    }

    // Load configuration
    let config = SimulationConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    println!("Lenia Simulation");
    println!("================");
    println!("Grid: {}x{}", config.grid_size, config.grid_size);
    println!(
        "Kernel: {} r={}",
        config.kernel_shape, config.kernel_radius
    );
    println!("Growth: mu={} sigma={}", config.mu, config.sigma);
    println!("Backend: {:?}", config.backend);
    println!("dt: {}", config.timestep);
    println!("Steps: {}", steps);
    println!();

    // Initialize
    let mut engine = Lenia::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Error creating engine: {}", e);
        std::process::exit(1);
    });

    println!("Initial state:");
    print_stats(&engine.stats());
    println!();

    // Run simulation
    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        engine.update();

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = engine.stats();
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Step {}/{}: mass={:.3}, active={}, {:.1} steps/s",
                i + 1,
                steps,
                stats.total_mass,
                stats.active_cells,
                steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("Final state:");
    print_stats(&engine.stats());
    println!();
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );

    if let Some(path) = output {
        let snapshot = WorldSnapshot::capture(&engine);
        if let Err(e) = snapshot.save(&path, CompressionType::None) {
            eprintln!("Error writing snapshot: {}", e);
            std::process::exit(1);
        }
        println!("Wrote snapshot to {}", path.display());
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json> [steps] [--output <snapshot>]", program);
    eprintln!("       {} --example", program);
    eprintln!("       {} --smoke-test", program);
    eprintln!();
    eprintln!("Run a headless Lenia simulation from JSON configuration.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to simulation configuration file");
    eprintln!("  steps        Number of simulation steps (default: 100)");
    eprintln!("  --output     Write the final world as a snapshot file");
    eprintln!("  --example    Print the default configuration");
    eprintln!("  --smoke-test Run a few frames with defaults and exit");
}

fn print_stats(stats: &SimulationStats) {
    println!("  Total mass: {:.3}", stats.total_mass);
    println!("  Mean value: {:.6}", stats.mean_value);
    println!("  Active cells: {}", stats.active_cells);
    println!(
        "  Value range: [{:.6}, {:.6}]",
        stats.min_value, stats.max_value
    );
}

/// Drive the engine the way a frontend would for a few frames: setters
/// first, then one update, then read the world for display. Late frames push
/// every slider to an extreme.
fn smoke_test() {
    let mut engine = Lenia::from_config(&SimulationConfig::default()).unwrap_or_else(|e| {
        eprintln!("Error creating engine: {}", e);
        std::process::exit(1);
    });

    for frame in 0..SMOKE_TEST_FRAMES {
        if frame == SMOKE_TEST_FRAMES / 2 {
            engine.set_kernel_shape_named("ring");
            engine.set_kernel_radius(20);
        }
        if frame == SMOKE_TEST_FRAMES - 2 {
            engine.set_kernel_radius(*RADIUS_RANGE.end() as i64);
            engine.set_timestep(*TIMESTEP_RANGE.end());
            engine.set_mu(*MU_RANGE.start());
            engine.set_sigma(*SIGMA_RANGE.start());
        }
        engine.update();
        let pixels = lenia::compute::gray_rgb8(engine.world());
        log::debug!("frame {}: {} bytes of pixels", frame, pixels.len());
    }

    if !engine.world().iter().all(|v| (0.0..=1.0).contains(v)) {
        eprintln!("Smoke test failed: world left [0, 1]");
        std::process::exit(1);
    }
    println!("Smoke test passed ({} frames)", SMOKE_TEST_FRAMES);
}

fn print_example_config() {
    let config = SimulationConfig {
        seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
