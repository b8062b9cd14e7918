// SPDX-License-Identifier: GPL-3.0-only

//! The aggregation queries behind every `/api/v1/pokemon` route.
//!
//! Each query fetches one base resource, fans out to the detail records it
//! points at, projects them and attaches pagination where it applies. Fan-out
//! is bounded by `fanout_limit` and fails as a whole on the first error.

pub mod evolution;
pub mod pagination;
pub mod projection;

use std::future::Future;

use futures::{StreamExt, TryStreamExt};
use tracing::{debug, instrument};

use crate::{
    api::{FetchError, PokeApi},
    entities::{ApiResource, PokemonSummary, SpeciesSummary},
    error::ProxyError,
};

use evolution::ChainBranches;
use pagination::{PageParams, PaginationWindow};
use projection::{project_pokemon, project_species};

pub const DEFAULT_FANOUT_LIMIT: usize = 10;

/// Projected Pokémon plus the window they were cut from
#[derive(Debug, Clone)]
pub struct PokemonPage {
    pub items: Vec<PokemonSummary>,
    pub pagination: PaginationWindow,
}

/// Species flags the list can be filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesFlag {
    Legendary,
    Mythical,
}

impl SpeciesFlag {
    pub fn matches(&self, species: &SpeciesSummary) -> bool {
        match self {
            SpeciesFlag::Legendary => species.is_legendary,
            SpeciesFlag::Mythical => species.is_mythical,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SpeciesFlag::Legendary => "legendary",
            SpeciesFlag::Mythical => "mythical",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChainOptions {
    pub branches: ChainBranches,
    /// Also fetch every member's species record
    pub with_species: bool,
}

#[derive(Debug, Clone)]
pub struct ChainMember {
    pub pokemon: PokemonSummary,
    pub species: Option<SpeciesSummary>,
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    api: PokeApi,
    fanout_limit: usize,
}

impl Aggregator {
    pub fn new(api: PokeApi, fanout_limit: usize) -> Self {
        Self {
            api,
            fanout_limit: fanout_limit.max(1),
        }
    }

    pub fn fanout_limit(&self) -> usize {
        self.fanout_limit
    }

    /// One page of the full Pokémon list
    #[instrument(skip(self), level = "debug")]
    pub async fn list_pokemon(&self, page: PageParams) -> Result<PokemonPage, ProxyError> {
        let list = self.api.fetch_pokemon_list(page.limit, page.offset).await?;
        let pagination = PaginationWindow::for_request(&page, list.count);

        let items = self
            .fetch_summaries(list.results.iter().map(ApiResource::id_or_name))
            .await?;

        debug!(count = items.len(), total = list.count, "listed pokemon");
        Ok(PokemonPage { items, pagination })
    }

    /// The Pokémon of one list page whose species carries `flag`
    #[instrument(skip(self), level = "debug")]
    pub async fn list_by_species_flag(
        &self,
        page: PageParams,
        flag: SpeciesFlag,
    ) -> Result<Vec<PokemonSummary>, ProxyError> {
        let list = self.api.fetch_pokemon_list(page.limit, page.offset).await?;

        let species = self
            .fetch_species_summaries(list.results.iter().map(ApiResource::id_or_name))
            .await?;

        let flagged: Vec<SpeciesSummary> = species
            .into_iter()
            .filter(|species| flag.matches(species))
            .collect();

        if flagged.is_empty() {
            return Err(ProxyError::NotFound(format!(
                "No {} pokemon found within the given limit and offset",
                flag.label()
            )));
        }

        let ids: Vec<String> = flagged.iter().map(|species| species.id.to_string()).collect();
        let items = self.fetch_summaries(ids).await?;

        debug!(flag = flag.label(), count = items.len(), "filtered pokemon by species flag");
        Ok(items)
    }

    /// A window over every Pokémon of a type
    #[instrument(skip(self), level = "debug")]
    pub async fn list_by_type(
        &self,
        type_id: &str,
        page: PageParams,
    ) -> Result<PokemonPage, ProxyError> {
        let pokemon_type = self.api.fetch_type_detail(type_id).await.map_err(|err| {
            ProxyError::not_found_or_upstream(err, || format!("Type not found with id {type_id}"))
        })?;

        let members: Vec<ApiResource> = pokemon_type
            .pokemon
            .into_iter()
            .map(|member| member.pokemon)
            .collect();

        let pagination = PaginationWindow::for_request(&page, members.len());
        let items = self
            .fetch_summaries(pagination.slice(&members).iter().map(ApiResource::id_or_name))
            .await?;

        Ok(PokemonPage { items, pagination })
    }

    /// A window over the species introduced in a generation
    #[instrument(skip(self), level = "debug")]
    pub async fn list_by_generation(
        &self,
        generation_id: &str,
        page: PageParams,
    ) -> Result<PokemonPage, ProxyError> {
        let generation = self.api.fetch_generation_detail(generation_id).await?;

        let pagination = PaginationWindow::for_request(&page, generation.pokemon_species.len());
        let items = self
            .fetch_summaries(
                pagination
                    .slice(&generation.pokemon_species)
                    .iter()
                    .map(ApiResource::id_or_name),
            )
            .await?;

        Ok(PokemonPage { items, pagination })
    }

    /// Every stage of the evolution chain a species belongs to, in evolution order
    #[instrument(skip(self), level = "debug")]
    pub async fn evolution_chain_of(
        &self,
        pokemon_id: &str,
        options: ChainOptions,
    ) -> Result<Vec<ChainMember>, ProxyError> {
        let species = self
            .api
            .fetch_species_detail(pokemon_id)
            .await
            .map_err(|err| {
                ProxyError::not_found_or_upstream(err, || {
                    format!("Species not found with id {pokemon_id}")
                })
            })?;

        let chain_url = species
            .evolution_chain
            .map(|chain| chain.url)
            .ok_or_else(|| {
                ProxyError::NotFound(format!("No evolution chain found for species {pokemon_id}"))
            })?;

        let chain = self.api.fetch_evolution_chain(&chain_url).await?;
        let members = evolution::walk(&chain.chain, options.branches);

        let species = async {
            if options.with_species {
                self.fetch_species_summaries(members.iter().map(ApiResource::id_or_name))
                    .await
                    .map(Some)
            } else {
                Ok(None)
            }
        };

        let (pokemon, species) = futures::try_join!(
            self.fetch_summaries(members.iter().map(ApiResource::id_or_name)),
            species
        )?;

        let mut species = species.map(Vec::into_iter);
        let chain = pokemon
            .into_iter()
            .map(|pokemon| ChainMember {
                pokemon,
                species: species.as_mut().and_then(|species| species.next()),
            })
            .collect();

        Ok(chain)
    }

    //
    // HELPERS
    //

    async fn fetch_summaries(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> Result<Vec<PokemonSummary>, FetchError> {
        let api = &self.api;
        self.fan_out(ids, |id| async move {
            api.fetch_pokemon_detail(&id)
                .await
                .map(|pokemon| project_pokemon(&pokemon))
        })
        .await
    }

    async fn fetch_species_summaries(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> Result<Vec<SpeciesSummary>, FetchError> {
        let api = &self.api;
        self.fan_out(ids, |id| async move {
            api.fetch_species_detail(&id)
                .await
                .map(|species| project_species(&species))
        })
        .await
    }

    /// Runs `fetch` for every item with at most `fanout_limit` requests in flight.
    ///
    /// Results keep the order of `items`; the first error drops the rest.
    async fn fan_out<I, F, Fut, T>(&self, items: I, fetch: F) -> Result<Vec<T>, FetchError>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let results: Vec<T> = futures::stream::iter(items)
            .map(fetch)
            .buffered(self.fanout_limit)
            .try_collect()
            .await?;

        debug!(count = results.len(), limit = self.fanout_limit, "fan-out completed");
        Ok(results)
    }
}
