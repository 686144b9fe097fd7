//! Load Simulator CLI
//!
//! Runs a time-boxed, rate-limited load of random math operations and prints
//! a summary (or the full record list as JSON).

use clap::Parser;
use loadsim_simulator::{
    logging, Complexity, ConfigError, LoadConfig, OperationList, OperationLogger, RateLimitMode,
    Simulator,
};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "loadsim")]
#[command(about = "Generate a rate-limited load of simple math operations")]
#[command(version)]
struct Cli {
    /// Seconds to run the simulation for
    #[arg(long, default_value = "10")]
    duration: u64,

    /// Complexity of the operations (easy, medium, complicated)
    #[arg(long, default_value = "easy", value_parser = parse_complexity)]
    complexity: Complexity,

    /// Maximum operations in flight at once (or per second, see --rate-limit-mode)
    #[arg(long, default_value = "5")]
    max_ops_per_sec: u32,

    /// How --max-ops-per-sec is enforced (concurrency, per-second)
    #[arg(long, default_value = "concurrency", value_parser = parse_rate_limit_mode)]
    rate_limit_mode: RateLimitMode,

    /// Number of concurrent workers sharing the rate limiter
    #[arg(long, default_value = "1")]
    workers: usize,

    /// Seed for reproducible operation selection
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many operations even if time remains
    #[arg(long)]
    max_operations: Option<u64>,

    /// Print every executed operation as JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Suppress the per-operation start/end log lines
    #[arg(long)]
    quiet_ops: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_complexity(s: &str) -> Result<Complexity, String> {
    s.parse::<Complexity>()
        .map_err(|e| ConfigError::from(e).to_string())
}

fn parse_rate_limit_mode(s: &str) -> Result<RateLimitMode, String> {
    s.parse().map_err(|e| format!("{e}"))
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = LoadConfig::new(cli.duration, cli.complexity)
        .with_max_ops_per_sec(cli.max_ops_per_sec)
        .with_rate_limit_mode(cli.rate_limit_mode)
        .with_workers(cli.workers);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(max) = cli.max_operations {
        config = config.with_max_operations(max);
    }

    let simulator = Simulator::new(config)?.with_logger(OperationLogger::new(!cli.quiet_ops));

    if cli.json {
        let run = simulator.run_with_report().await?;
        let list = OperationList::from(run.records);
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        // The summary never prints records, so don't keep them.
        let config = simulator.config();
        println!(
            "Starting {} load for {}s...",
            config.complexity,
            config.duration.as_secs()
        );
        simulator.run_report_only().await?.print();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // A failed install only loses diagnostics; the run goes ahead.
    logging::init(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
