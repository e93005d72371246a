//! Vitrine storefront entry point.

use tracing::error;

use vitrine_storefront::config::AppConfig;
use vitrine_storefront::{init_tracing, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    run(config).await?;
    Ok(())
}
