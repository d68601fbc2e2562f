//! Creates the `customers` table and seeds it with sample rows.
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p customer-seed --bin init_db
//! ```

use customer_seed::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the confirmation line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = SeedConfig::from_env()?;
    tracing::info!("Loaded configuration: {config:?}");

    let report = Seeder::new(config).run().await?;

    println!("{}", report.confirmation());
    Ok(())
}
