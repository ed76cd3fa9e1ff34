mod config;
mod models;
mod seeds;
mod sql;
mod utils;

use anyhow::Result;
use std::io::{self, BufWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use models::NetworkMap;

fn main() -> Result<()> {
    // Pick up a .env next to the working directory, if any
    dotenvy::dotenv().ok();

    // Initialize tracing. stdout carries the SQL, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "populate_vlans=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cfg = Config::load();

    let network_map = match cfg.network_map_path() {
        Some(path) => {
            tracing::info!("Network map: {}", path);
            NetworkMap::load(path)?
        }
        None => {
            tracing::info!("Network map: built-in");
            seeds::default_network_map()?
        }
    };
    tracing::info!(
        "Loaded {} locations, {} networks",
        network_map.locations().count(),
        network_map.leaf_count()
    );
    if network_map.is_empty() {
        tracing::warn!("Network map is empty, writing schema only");
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    sql::emit_schema(&mut out, cfg.database_name())?;
    let count = sql::emit_inserts(&mut out, &network_map)?;

    tracing::info!("Wrote {} vlandata inserts", count);
    Ok(())
}
