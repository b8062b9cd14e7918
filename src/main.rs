// SPDX-License-Identifier: GPL-3.0-only

use dexproxy::{Config, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env, environment and flags
    let config = Config::load();

    logging::init_logging(config.is_development())?;

    if let Err(err) = server::serve(config).await {
        tracing::error!(error = %format!("{err:#}"), "server failed");
        return Err(err);
    }

    Ok(())
}
