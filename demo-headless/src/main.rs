use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use windfield_core::presets::{default_scene, random_cone_field, random_point_field, random_spiral_field};
use windfield_core::{ParticleConfig, ParticleSystem};

/// Headless wind-field particle simulation
#[derive(Parser, Debug)]
#[command(name = "windfield-demo")]
#[command(about = "Steps a particle cloud through wind fields and reports statistics", long_about = None)]
struct Args {
    /// Number of particles
    #[arg(short = 'n', long, default_value_t = 5000)]
    count: usize,

    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 10.0)]
    duration: f32,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Speed factor scaling both force response and the speed cap
    #[arg(short, long, default_value_t = 1.0)]
    speed_factor: f32,

    /// Seed for particle spawning and random fields
    #[arg(long)]
    seed: Option<u64>,

    /// Extra random point fields on top of the default scene
    #[arg(long, default_value_t = 0)]
    points: u32,

    /// Extra random cone fields
    #[arg(long, default_value_t = 0)]
    cones: u32,

    /// Extra random spiral fields
    #[arg(long, default_value_t = 0)]
    spirals: u32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 1.0)]
    report_interval: f32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if !(args.dt > 0.0 && args.dt.is_finite()) {
        error!("Timestep must be positive and finite, got {}", args.dt);
        std::process::exit(2);
    }

    let mut config = ParticleConfig::default()
        .with_count(args.count)
        .with_speed_factor(args.speed_factor);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };
    let mut fields = default_scene(&mut rng);
    for _ in 0..args.points {
        fields.add(random_point_field(&mut rng));
    }
    for _ in 0..args.cones {
        fields.add(random_cone_field(&mut rng));
    }
    for _ in 0..args.spirals {
        fields.add(random_spiral_field(&mut rng));
    }

    let mut sim = match ParticleSystem::new(config) {
        Ok(sim) => sim.with_fields(fields),
        Err(e) => {
            error!("Failed to create particle system: {}", e);
            std::process::exit(1);
        }
    };

    for field in sim.fields().iter() {
        info!(
            "{} {} at ({:.1}, {:.1}, {:.1}) strength {:.2}",
            field.kind().name(),
            field.id(),
            field.position().x,
            field.position().y,
            field.position().z,
            field.strength()
        );
    }

    println!("Time(s) | Particles | Fields | Mean speed | Max speed");
    println!("--------|-----------|--------|------------|----------");

    let steps = (args.duration / args.dt).ceil().max(0.0) as usize;
    let mut next_report = 0.0_f64;
    for _ in 0..steps {
        sim.step(args.dt);
        if sim.elapsed() >= next_report {
            let stats = sim.stats();
            println!(
                "{:7.2} | {:9} | {:6} | {:10.3} | {:9.3}",
                stats.elapsed,
                stats.particle_count,
                stats.enabled_field_count,
                stats.mean_speed,
                stats.max_speed
            );
            next_report += f64::from(args.report_interval.max(args.dt));
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("{}", sim.stats());
}
