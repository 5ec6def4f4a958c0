use gravsim::{load_scenario, run_2d, run_headless, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "2D n-body gravity sandbox")]
struct Args {
    /// Scenario file, looked up as given and then under `scenarios/`
    #[arg(short, long, default_value = "rocket_earth.yaml")]
    file_name: String,

    /// Run without a window and log conservation diagnostics
    #[arg(long)]
    headless: bool,

    /// Fixed steps to run in headless mode
    #[arg(long, default_value_t = 10_000)]
    steps: u64,

    /// Log a report every N steps in headless mode, 0 disables
    #[arg(long, default_value_t = 1_000)]
    report_every: u64,
}

fn resolve_path(file_name: &str) -> PathBuf {
    let given = PathBuf::from(file_name);
    if given.exists() {
        return given;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario_config(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = resolve_path(file_name);
    load_scenario(&config_path)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // the windowed viewer gets its subscriber from Bevy's LogPlugin
    if args.headless {
        init_tracing();
    }

    let scenario_cfg = load_scenario_config(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)
        .with_context(|| format!("cannot build scenario from {}", args.file_name))?;

    if args.headless {
        run_headless(&mut scenario, args.steps, args.report_every);
        Ok(())
    } else {
        run_2d(scenario)
    }
}
