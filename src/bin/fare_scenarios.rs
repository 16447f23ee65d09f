//! Fare Scenario Comparison Binary
//!
//! Simulates daily revenue under the current fare, a 10% increase and a 10%
//! decrease, and prints each distribution's summary.
//!
//! ## Usage
//! ```bash
//! cargo run --bin fare_scenarios --release -- --age-preset adult-majority
//! cargo run --bin fare_scenarios --release -- --config fares.toml --parallel
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fare_simulation::config::SimulationConfig;
use fare_simulation::passenger::AgePreset;
use fare_simulation::scenario::{compare_scenarios, ScenarioResult};
use fare_simulation::{FareError, Result};

#[derive(Parser, Debug)]
#[command(name = "fare_scenarios", version, about = "Rail fare revenue Monte Carlo")]
struct Args {
    #[arg(long, help = "TOML configuration file")]
    config: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        required_unless_present = "config",
        help = "Age mix of passengers"
    )]
    age_preset: Option<PresetArg>,
    #[arg(long, help = "Simulated days per scenario")]
    days: Option<usize>,
    #[arg(long, help = "Base random seed")]
    seed: Option<u64>,
    #[arg(long, default_value_t = false, help = "Simulate days across all cores")]
    parallel: bool,
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    AdultMajority,
    SeniorMajority,
}

impl From<PresetArg> for AgePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::AdultMajority => AgePreset::AdultMajority,
            PresetArg::SeniorMajority => AgePreset::SeniorMajority,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match (&args.config, args.age_preset) {
        (Some(path), _) => SimulationConfig::load(path)?,
        (None, Some(preset)) => SimulationConfig::new(preset.into()),
        (None, None) => {
            return Err(FareError::config("--age-preset is required without --config"))
        }
    };

    if let Some(preset) = args.age_preset {
        config.age_preset = preset.into();
    }
    if let Some(days) = args.days {
        config.days = days;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.parallel |= args.parallel;

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;

    println!("=======================================================");
    println!("  Daily Revenue Monte Carlo");
    println!("  Fare scenarios under elastic demand");
    println!("=======================================================");
    println!();
    println!("Parameters:");
    println!("  Days per scenario:       {}", config.days);
    println!("  Expected passengers:     {:.1}", config.passenger_mean);
    println!("  Age mix:                 {}", config.age_preset.name());
    println!(
        "  Fare step / demand shift: {:.0}% / {:.0}%",
        config.fare_step * 100.0,
        config.ridership_shift * 100.0
    );
    println!();

    let results = compare_scenarios(&config)?;

    for result in &results {
        println!("Scenario: {}", result.label);
        println!("{}", "-".repeat(50));
        result.print();
        println!();
    }

    print_comparison_table(&results);
    Ok(())
}

fn print_comparison_table(results: &[ScenarioResult]) {
    let Some(baseline) = results.first() else {
        return;
    };

    println!("| Scenario        | Mean Revenue | Std Dev  | vs Current |");
    println!("|-----------------|--------------|----------|------------|");

    for result in results {
        println!(
            "| {:15} | ${:11.2} | ${:7.2} | {:+9.2}% |",
            result.label,
            result.mean(),
            result.std_dev(),
            result.relative_change(baseline) * 100.0,
        );
    }
}
