// src/bin/simulate.rs
//
// Usage: simulate [config.json] [--days N] [--seed S]
// Prints the daily OHLC bars as JSON on stdout. Set RUST_LOG=info for day summaries.

use log::info;
use market_microstructure_sim::{Market, SimulationConfig};
use std::error::Error;

const DEFAULT_DAYS: usize = 5;
const DEFAULT_SEED: u64 = 42;

struct Args {
    config_path: Option<String>,
    days: usize,
    seed: u64,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args {
        config_path: None,
        days: DEFAULT_DAYS,
        seed: DEFAULT_SEED,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--days" => {
                let v = it.next().ok_or("--days needs a value")?;
                args.days = v.parse()?;
            }
            "--seed" => {
                let v = it.next().ok_or("--seed needs a value")?;
                args.seed = v.parse()?;
            }
            path if args.config_path.is_none() && !path.starts_with("--") => {
                args.config_path = Some(path.to_string());
            }
            other => return Err(format!("unexpected argument: {}", other).into()),
        }
    }
    Ok(args)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => SimulationConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };

    let mut market = Market::new(config, args.seed)?;
    info!("running {} days with seed {}", args.days, args.seed);
    let bars = market.run_days(args.days);

    println!("{}", serde_json::to_string_pretty(bars)?);
    Ok(())
}
