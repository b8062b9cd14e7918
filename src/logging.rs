// SPDX-License-Identifier: GPL-3.0-only

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise development mode logs every request.
pub fn init_logging(development: bool) -> Result<()> {
    let default_filter = if development {
        "dexproxy=debug,tower_http=debug"
    } else {
        "dexproxy=info,tower_http=warn"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(development))
        .try_init()?;

    Ok(())
}
