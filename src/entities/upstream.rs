// SPDX-License-Identifier: GPL-3.0-only

//! Shapes of the PokéApi payloads we read.
//!
//! Only the fields the proxy uses are typed; serde ignores the rest, except for
//! [`ApiSpecies`] which keeps every other field around so it can be passed on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named pointer into an upstream collection (`{name, url}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResource {
    pub name: String,
    pub url: String,
}

impl ApiResource {
    /// The numeric id at the end of the resource url, e.g. `.../pokemon-species/133/`
    pub fn id(&self) -> Option<i64> {
        self.url
            .trim_end_matches('/')
            .split('/')
            .next_back()
            .and_then(|s| s.parse().ok())
    }

    /// Identifier to use for a follow-up fetch, the id when the url carries one
    pub fn id_or_name(&self) -> String {
        self.id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// One page of `/pokemon/`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPokemonList {
    pub count: usize,
    pub results: Vec<ApiResource>,
}

/// `/pokemon/{id or name}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPokemon {
    pub id: i64,
    pub name: String,
    pub order: i64,
    #[serde(default)]
    pub sprites: ApiSprites,
    pub types: Vec<ApiPokemonType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSprites {
    #[serde(default)]
    pub other: Option<ApiOtherSprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiOtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ApiArtwork>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiArtwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPokemonType {
    #[serde(rename = "type")]
    pub type_: ApiResource,
}

/// `/pokemon-species/{id or name}`
///
/// The flags and the evolution chain pointer are typed, everything else is kept
/// verbatim in `other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSpecies {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    #[serde(default)]
    pub evolution_chain: Option<ApiUrl>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// An unnamed upstream pointer (`{url}`), as used by `evolution_chain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUrl {
    pub url: String,
}

/// `/type/{id or name}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiType {
    pub id: i64,
    pub name: String,
    pub pokemon: Vec<ApiTypeMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTypeMember {
    pub pokemon: ApiResource,
}

/// `/generation/{id or name}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGeneration {
    pub id: i64,
    pub name: String,
    pub pokemon_species: Vec<ApiResource>,
}

/// `/evolution-chain/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEvolutionChain {
    pub id: i64,
    pub chain: ChainLink,
}

/// A node of an evolution tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainLink {
    pub species: ApiResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}
