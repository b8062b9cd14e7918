// SPDX-License-Identifier: GPL-3.0-only

use serde_json::{Map, Value};

use crate::entities::{ApiPokemon, ApiSpecies, PokemonSummary, SpeciesSummary};

/// Species fields too verbose to pass on
pub const DROPPED_SPECIES_FIELDS: [&str; 9] = [
    "base_happiness",
    "capture_rate",
    "flavor_text_entries",
    "form_descriptions",
    "genera",
    "names",
    "pal_park_encounters",
    "pokedex_numbers",
    "varieties",
];

/// Parses the PokéApi pokemon data to our summary format
pub fn project_pokemon(pokemon: &ApiPokemon) -> PokemonSummary {
    PokemonSummary {
        id: pokemon.id,
        name: pokemon.name.clone(),
        order: pokemon.order,
        image_url: pokemon
            .sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|artwork| artwork.front_default.clone()),
        types: pokemon
            .types
            .iter()
            .map(|types| types.type_.name.to_string())
            .collect(),
    }
}

/// Copies a species record leaving the verbose fields behind
pub fn project_species(species: &ApiSpecies) -> SpeciesSummary {
    let other = species
        .other
        .iter()
        .filter(|(key, _)| !DROPPED_SPECIES_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    SpeciesSummary {
        id: species.id,
        name: species.name.clone(),
        is_legendary: species.is_legendary,
        is_mythical: species.is_mythical,
        evolution_chain: species.evolution_chain.clone(),
        other,
    }
}

/// A pokemon summary overlaid with its species record.
///
/// Species fields overwrite summary fields of the same name, so `order` is the
/// species order.
pub fn merge_species(
    pokemon: &PokemonSummary,
    species: &SpeciesSummary,
) -> Result<Map<String, Value>, serde_json::Error> {
    let mut merged = match serde_json::to_value(pokemon)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    if let Value::Object(species) = serde_json::to_value(species)? {
        for (key, value) in species {
            merged.insert(key, value);
        }
    }

    Ok(merged)
}
