// SPDX-License-Identifier: GPL-3.0-only

use std::{net::IpAddr, time::Duration};

use clap::Parser;

use crate::pipeline::DEFAULT_FANOUT_LIMIT;

/// Runtime configuration, read once at startup.
///
/// Every flag can also be given through the environment (and a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "dexproxy", version, about)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Root of the upstream PokéApi, e.g. https://pokeapi.co/api/v2
    #[arg(long, env = "BASE_URL")]
    pub base_url: String,

    /// `development` turns on verbose request logging
    #[arg(long, env = "NODE_ENV")]
    pub node_env: Option<String>,

    /// Upper bound of concurrent upstream requests per fan-out
    #[arg(long, env = "FANOUT_LIMIT", default_value_t = DEFAULT_FANOUT_LIMIT)]
    pub fanout_limit: usize,

    /// Per-request upstream timeout, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Loads a `.env` file if there is one, then parses flags and environment
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn is_development(&self) -> bool {
        self.node_env
            .as_deref()
            .is_some_and(|env| env.eq_ignore_ascii_case("development"))
    }

    /// Human readable name of the mode we run in, for the startup log
    pub fn mode(&self) -> &str {
        self.node_env.as_deref().unwrap_or("production")
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
