//! # MallPark Console
//!
//! ## Usage
//! ```bash
//! # Run against the platform config (or $MALLPARK_CONFIG)
//! cargo run -p mallpark-console
//!
//! # Explicit config file
//! cargo run -p mallpark-console -- --config ./parking.toml
//!
//! # Write a sample config and exit
//! cargo run -p mallpark-console -- --init ./parking.toml
//! ```

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info};

use mallpark_console::{execute, init_tracing, respond, Command};
use mallpark_engine::{ParkingConfig, SessionManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut init_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--init" => {
                if i + 1 < args.len() {
                    init_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("MallPark Console");
                println!();
                println!("Usage: mallpark [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Parking config file (default: platform config dir)");
                println!("      --init <PATH>    Write a sample config to PATH and exit");
                println!("  -h, --help           Show this help message");
                println!();
                println!("{}", mallpark_console::commands::USAGE);
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(path) = init_path {
        let path = ParkingConfig::sample().save(Some(path))?;
        println!("Sample config written to {}", path.display());
        return Ok(());
    }

    let config = ParkingConfig::load(config_path)?;
    let manager = SessionManager::from_config(config)?;
    info!(malls = ?manager.mall_ids(), "MallPark console ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;

        let result = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(&manager, command, Utc::now()),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            debug!(code = ?e.code, "{}", e.message);
        }

        writeln!(stdout, "{}", respond(result))?;
        stdout.flush()?;
    }

    info!("MallPark console stopped");
    Ok(())
}
