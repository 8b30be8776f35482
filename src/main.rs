use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};

use chrono::{DateTime, Utc};
use immudb_stats::{aggregate, config::StatsConfig, logging, FamilyMap, Result, Snapshot};
use serde::Serialize;
use tracing::{error, info};

#[derive(Serialize)]
struct Report<'a> {
    snapshot: &'a Snapshot,
    active_clients: BTreeMap<String, DateTime<Utc>>,
}

fn read_input(config: &StatsConfig) -> Result<String> {
    match &config.input {
        Some(path) => {
            info!("Reading metric families from {}", path.display());
            Ok(fs::read_to_string(path)?)
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run() -> Result<()> {
    let config = StatsConfig::from_env()?;
    let families: FamilyMap = serde_json::from_str(&read_input(&config)?)?;

    let snapshot = aggregate(&families)?;
    let active = snapshot.clients_active_within(Utc::now(), config.active_window);
    info!(
        "Aggregated {} families: {} clients, {} active",
        families.len(),
        snapshot.nb_clients,
        active.len()
    );

    let report = Report {
        snapshot: &snapshot,
        active_clients: active,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() {
    if let Err(e) = logging::init_logger(env!("CARGO_CRATE_NAME")) {
        eprintln!("{}", e);
    }

    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
