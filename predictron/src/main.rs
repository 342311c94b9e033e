use anyhow::{bail, Context, Result};
use clap::{Arg, Command};
use predictron::{Config, Engine};
use std::str::FromStr;
use tracing::{info, Level};

fn main() -> Result<()> {
    // Parse arguments
    let matches = Command::new("predictron")
        .about("Force wins against a janken table by predicting its oracle.")
        .arg(Arg::new("config").long("config").required(false))
        .get_matches();

    // Load from config file, or run with defaults
    let config = match matches.get_one::<String>("config") {
        Some(path) => {
            let raw = std::fs::read_to_string(path).context("could not read config file")?;
            serde_yaml::from_str(&raw).context("could not parse config file")?
        }
        None => Config::default(),
    };

    // Setup logging
    let level = Level::from_str(&config.log_level).context("invalid log level")?;
    tracing_subscriber::fmt().with_max_level(level).init();
    info!(
        attacks = config.attacks,
        seed = config.seed,
        "starting predictron"
    );

    // Run the attack loop
    let summary = Engine::new(&config).run()?;
    if summary.won != summary.total {
        bail!(
            "prediction missed: won {} of {} uncontested attacks",
            summary.won,
            summary.total
        );
    }
    Ok(())
}
