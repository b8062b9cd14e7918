// SPDX-License-Identifier: GPL-3.0-only

//! An aggregation proxy over PokéApi.
//!
//! Every route fetches one upstream resource, fans out to the records it
//! points at and answers with a compact, paginated JSON shape.

pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod server;

pub use api::{FetchError, PokeApi};
pub use config::Config;
pub use error::ProxyError;
pub use pipeline::Aggregator;
pub use server::{AppState, router};
