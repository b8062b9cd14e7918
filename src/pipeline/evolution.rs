// SPDX-License-Identifier: GPL-3.0-only

use serde::Deserialize;

use crate::entities::{ApiResource, ChainLink};

/// How much of a branching evolution tree to walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainBranches {
    /// Only ever follow the first evolution of every stage (Eevee -> Vaporeon)
    #[default]
    First,
    /// Every branch, in pre-order
    All,
}

/// Flattens an evolution chain following `evolves_to[0]` at every stage.
///
/// Sibling branches are dropped: for Eevee this yields `[eevee, vaporeon]`.
pub fn flatten(root: &ChainLink) -> Vec<ApiResource> {
    let mut species = Vec::new();
    let mut link = Some(root);

    while let Some(current) = link {
        species.push(current.species.clone());
        link = current.evolves_to.first();
    }

    species
}

/// Flattens the whole tree, each stage followed by all of its evolutions
pub fn flatten_all(root: &ChainLink) -> Vec<ApiResource> {
    let mut species = vec![root.species.clone()];

    for evolution in &root.evolves_to {
        species.extend(flatten_all(evolution));
    }

    species
}

pub fn walk(root: &ChainLink, branches: ChainBranches) -> Vec<ApiResource> {
    match branches {
        ChainBranches::First => flatten(root),
        ChainBranches::All => flatten_all(root),
    }
}
