use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use ringmc::{initialize_system, read_config, run_us, Lattice};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML run configuration
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Override the configured output file stem
    #[arg(long)]
    filebase: Option<String>,

    /// Override the configured steps per iteration
    #[arg(long)]
    steps: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(error) = run() {
        tracing::error!(%error, "run failed");
        std::process::exit(1);
    }
}

fn run() -> ringmc::Result<()> {
    let args = Args::parse();
    let mut config = read_config(&args.config)?;
    if let Some(filebase) = args.filebase {
        config.run.filebase = filebase;
    }
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }

    let mut lattice = Lattice::new(
        config.system.delta,
        config.system.min_height(),
        config.system.min_height(),
        config.system.max_height(),
    );
    let mut system = initialize_system(&config.system, &mut lattice)?;
    let mut rng = match config.run.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    run_us(&mut system, &mut lattice, &config, &mut rng)
}
