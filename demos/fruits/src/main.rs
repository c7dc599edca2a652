//! Fruit market server.
//!
//! Configuration comes from `fruits.toml` when present, then `.env`, then
//! `FRUITS__SECTION__KEY` environment variables:
//!
//! ```bash
//! FRUITS__SERVER__HTTP_ADDR=127.0.0.1:3000 FRUITS__LOGGING__FORMAT=pretty cargo run -p daedalus-demo-fruits
//! curl localhost:3000/market
//! curl localhost:3000/openapi.yaml
//! ```

use std::sync::Arc;

use anyhow::Context;
use daedalus::config::ConfigLoader;
use daedalus::telemetry::init_logging;
use daedalus_demo_fruits::{app, Market};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_optional_file("fruits.toml")?
        .with_dotenv()
        .with_env_prefix("FRUITS")
        .load()
        .context("invalid configuration")?;

    init_logging(&config.logging.log_config())?;

    let app = app(&config, Arc::new(Market::seeded())).context("route registration failed")?;
    tracing::info!(addr = %config.server.http_addr, "fruit market open");

    app.serve().await?;
    Ok(())
}
