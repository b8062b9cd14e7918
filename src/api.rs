// SPDX-License-Identifier: GPL-3.0-only

use std::{sync::Arc, time::Duration};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::entities::{
    ApiEvolutionChain, ApiGeneration, ApiPokemon, ApiPokemonList, ApiSpecies, ApiType,
};

/// Errors produced while talking to PokéApi
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not build the upstream http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid upstream url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream url {url} cannot carry a resource path")]
    NotABase { url: String },

    #[error("{0:?} is not a resource identifier")]
    InvalidIdentifier(String),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("could not decode the body of {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Whether PokéApi told us the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Thin client over the PokéApi REST endpoints.
///
/// The base url is injected so tests can point it at a local server.
#[derive(Debug)]
pub struct PokeApi {
    base_url: Url,
    client: Arc<reqwest::Client>,
}

impl Clone for PokeApi {
    fn clone(&self) -> Self {
        PokeApi {
            base_url: self.base_url.clone(),
            client: Arc::clone(&self.client),
        }
    }
}

impl PokeApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<PokeApi, FetchError> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|source| FetchError::InvalidUrl {
            url: trimmed.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::NotABase {
                url: trimmed.to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(timeout)
            .user_agent(concat!("dexproxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(PokeApi {
            base_url,
            client: Arc::new(client),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    //
    // API
    //

    /// One page of the full Pokémon list
    pub async fn fetch_pokemon_list(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<ApiPokemonList, FetchError> {
        // PokéApi serves the list at `/pokemon/`, trailing slash included
        let mut url = self.resource_url(&["pokemon", ""])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.get(url).await
    }

    pub async fn fetch_pokemon_detail(&self, name_or_id: &str) -> Result<ApiPokemon, FetchError> {
        self.get(self.resource_url(&["pokemon", checked(name_or_id)?])?)
            .await
    }

    pub async fn fetch_species_detail(&self, name_or_id: &str) -> Result<ApiSpecies, FetchError> {
        self.get(self.resource_url(&["pokemon-species", checked(name_or_id)?])?)
            .await
    }

    pub async fn fetch_type_detail(&self, type_id: &str) -> Result<ApiType, FetchError> {
        self.get(self.resource_url(&["type", checked(type_id)?])?)
            .await
    }

    pub async fn fetch_generation_detail(
        &self,
        generation_id: &str,
    ) -> Result<ApiGeneration, FetchError> {
        self.get(self.resource_url(&["generation", checked(generation_id)?])?)
            .await
    }

    /// Evolution chains are only ever reached through the absolute url a species points at
    pub async fn fetch_evolution_chain(&self, url: &str) -> Result<ApiEvolutionChain, FetchError> {
        let url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        self.get(url).await
    }

    //
    // HELPERS
    //

    /// Appends `segments` to the base url, each one percent-encoded on its own so
    /// `/`, `?` and `#` inside an identifier stay part of that segment
    fn resource_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::NotABase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "fetching upstream resource");

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(%url, error = %source, "upstream request failed");
                return Err(FetchError::Transport {
                    url: url.into(),
                    source,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "upstream answered with an error status");
            return Err(FetchError::Status {
                url: url.into(),
                status,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| FetchError::Decode {
                url: url.into(),
                source,
            })
    }
}

/// Dot segments would be resolved away by the url and empty ones hit the list endpoint
fn checked(id: &str) -> Result<&str, FetchError> {
    match id {
        "" | "." | ".." => Err(FetchError::InvalidIdentifier(id.to_string())),
        id => Ok(id),
    }
}
