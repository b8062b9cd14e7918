// SPDX-License-Identifier: GPL-3.0-only

mod pokemon_summary;
mod species_summary;
mod upstream;

pub use pokemon_summary::PokemonSummary;
pub use species_summary::SpeciesSummary;
pub use upstream::{
    ApiArtwork, ApiEvolutionChain, ApiGeneration, ApiOtherSprites, ApiPokemon, ApiPokemonList,
    ApiPokemonType, ApiResource, ApiSpecies, ApiSprites, ApiType, ApiTypeMember, ApiUrl, ChainLink,
};
