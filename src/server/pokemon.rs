// SPDX-License-Identifier: GPL-3.0-only

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::{
    entities::PokemonSummary,
    error::ProxyError,
    pipeline::{
        ChainMember, ChainOptions, SpeciesFlag,
        evolution::ChainBranches,
        pagination::{PageParams, PageQuery, PaginationWindow},
        projection::merge_species,
    },
};

const BASE_PATH: &str = "/api/v1/pokemon";

/// Success envelope shared by every pokemon route
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationWindow>,
    pub data: PokemonList<T>,
}

#[derive(Debug, Serialize)]
pub struct PokemonList<T> {
    pub count: usize,
    pub pokemon: Vec<T>,
}

impl<T> ApiResponse<T> {
    fn new(pokemon: Vec<T>) -> Self {
        Self {
            success: true,
            pagination: None,
            data: PokemonList {
                count: pokemon.len(),
                pokemon,
            },
        }
    }

    fn paginated(pokemon: Vec<T>, pagination: PaginationWindow) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::new(pokemon)
        }
    }
}

type PokemonResponse = Result<Json<ApiResponse<PokemonSummary>>, ProxyError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(BASE_PATH, get(list_pokemon))
        .route(&format!("{BASE_PATH}/"), get(list_pokemon))
        .route(&format!("{BASE_PATH}/legendary"), get(list_legendary))
        .route(&format!("{BASE_PATH}/legendary/"), get(list_legendary))
        .route(&format!("{BASE_PATH}/mythical"), get(list_mythical))
        .route(&format!("{BASE_PATH}/mythical/"), get(list_mythical))
        .route(
            &format!("{BASE_PATH}/chain/{{pokemon_id}}"),
            get(evolution_chain),
        )
        .route(&format!("{BASE_PATH}/type/{{type_id}}"), get(list_by_type))
        .route(
            &format!("{BASE_PATH}/generation/{{generation}}"),
            get(list_by_generation),
        )
}

/// GET /api/v1/pokemon/
async fn list_pokemon(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> PokemonResponse {
    let page = state.aggregator.list_pokemon(page_params(query)?).await?;
    Ok(Json(ApiResponse::paginated(page.items, page.pagination)))
}

/// GET /api/v1/pokemon/legendary/
async fn list_legendary(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> PokemonResponse {
    let pokemon = state
        .aggregator
        .list_by_species_flag(page_params(query)?, SpeciesFlag::Legendary)
        .await?;
    Ok(Json(ApiResponse::new(pokemon)))
}

/// GET /api/v1/pokemon/mythical/
async fn list_mythical(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> PokemonResponse {
    let pokemon = state
        .aggregator
        .list_by_species_flag(page_params(query)?, SpeciesFlag::Mythical)
        .await?;
    Ok(Json(ApiResponse::new(pokemon)))
}

#[derive(Debug, Default, Deserialize)]
struct ChainQuery {
    #[serde(default)]
    branches: ChainBranches,
    /// Merge each member's species record into its entry
    #[serde(default)]
    species: bool,
}

/// GET /api/v1/pokemon/chain/{pokemon_id}
async fn evolution_chain(
    State(state): State<AppState>,
    Path(pokemon_id): Path<String>,
    query: Result<Query<ChainQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Value>>, ProxyError> {
    let Query(query) = query.map_err(|rejection| ProxyError::BadRequest(rejection.body_text()))?;
    let options = ChainOptions {
        branches: query.branches,
        with_species: query.species,
    };

    let members = state
        .aggregator
        .evolution_chain_of(&pokemon_id, options)
        .await?;

    let entries = members
        .iter()
        .map(chain_entry)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(|err| ProxyError::Internal(format!("Could not serialize chain entry: {err}")))?;

    Ok(Json(ApiResponse::new(entries)))
}

/// GET /api/v1/pokemon/type/{type_id}
async fn list_by_type(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> PokemonResponse {
    let page = state
        .aggregator
        .list_by_type(&type_id, page_params(query)?)
        .await?;
    Ok(Json(ApiResponse::paginated(page.items, page.pagination)))
}

/// GET /api/v1/pokemon/generation/{generation}
async fn list_by_generation(
    State(state): State<AppState>,
    Path(generation): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> PokemonResponse {
    let page = state
        .aggregator
        .list_by_generation(&generation, page_params(query)?)
        .await?;
    Ok(Json(ApiResponse::paginated(page.items, page.pagination)))
}

fn page_params(query: Result<Query<PageQuery>, QueryRejection>) -> Result<PageParams, ProxyError> {
    let Query(query) = query.map_err(|rejection| ProxyError::BadRequest(rejection.body_text()))?;
    PageParams::try_from(query)
}

fn chain_entry(member: &ChainMember) -> Result<Value, serde_json::Error> {
    match &member.species {
        Some(species) => merge_species(&member.pokemon, species).map(Value::Object),
        None => serde_json::to_value(&member.pokemon),
    }
}
