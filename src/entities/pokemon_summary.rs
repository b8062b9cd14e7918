// SPDX-License-Identifier: GPL-3.0-only

use std::fmt::Debug;

use serde::Serialize;

/// Simple owned data structure, what the proxy returns for every Pokémon
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonSummary {
    pub id: i64,
    pub name: String,
    pub order: i64,
    pub image_url: Option<String>,
    pub types: Vec<String>,
}

impl Debug for PokemonSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokemonSummary")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
