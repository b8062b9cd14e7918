// SPDX-License-Identifier: GPL-3.0-only

//! A small stand-in for PokéApi, served from a local port.

#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    routing::get,
};
use dexproxy::{Aggregator, AppState, PokeApi, router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Member ids that make the fake upstream fail with a 500
pub const BROKEN_POKEMON_ID: i64 = 666;

struct Dex {
    id: i64,
    name: &'static str,
    types: &'static [&'static str],
    legendary: bool,
    mythical: bool,
    chain: i64,
}

const fn dex(id: i64, name: &'static str, types: &'static [&'static str], chain: i64) -> Dex {
    Dex {
        id,
        name,
        types,
        legendary: false,
        mythical: false,
        chain,
    }
}

const ROSTER: &[Dex] = &[
    dex(1, "bulbasaur", &["grass", "poison"], 1),
    dex(2, "ivysaur", &["grass", "poison"], 1),
    dex(3, "venusaur", &["grass", "poison"], 1),
    dex(4, "charmander", &["fire"], 2),
    dex(5, "charmeleon", &["fire"], 2),
    dex(6, "charizard", &["fire", "flying"], 2),
    dex(133, "eevee", &["normal"], 67),
    dex(134, "vaporeon", &["water"], 67),
    dex(135, "jolteon", &["electric"], 67),
    dex(136, "flareon", &["fire"], 67),
    Dex {
        legendary: true,
        ..dex(144, "articuno", &["ice", "flying"], 72)
    },
    Dex {
        mythical: true,
        ..dex(151, "mew", &["psychic"], 78)
    },
];

/// Species records report `order` shifted by this much, pokemon records do not
pub const SPECIES_ORDER_OFFSET: i64 = 1000;

/// Ids of the synthetic members of the `normal` type
pub const NORMAL_TYPE_IDS: std::ops::Range<i64> = 1000..1030;

#[derive(Clone)]
struct FakeState {
    base_url: String,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
}

pub struct FakePokeApi {
    pub base_url: String,
    peak: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
}

impl FakePokeApi {
    pub async fn start() -> Self {
        Self::start_with_delay(Duration::ZERO).await
    }

    /// Every pokemon detail request sleeps for `delay` before answering
    pub async fn start_with_delay(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind the fake upstream");
        let base_url = format!(
            "http://{}",
            listener.local_addr().expect("Fake upstream has no address")
        );

        let state = FakeState {
            base_url: base_url.clone(),
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(AtomicUsize::new(0)),
        };
        let peak = Arc::clone(&state.peak);
        let requests = Arc::clone(&state.requests);

        let app = Router::new()
            .route("/pokemon/", get(pokemon_list))
            .route("/pokemon/{id}", get(pokemon_detail))
            .route("/pokemon-species/{id}", get(species_detail))
            .route("/type/{id}", get(type_detail))
            .route("/generation/{id}", get(generation_detail))
            .route("/evolution-chain/{id}", get(evolution_chain))
            .route("/evolution-chain/{id}/", get(evolution_chain))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake upstream stopped");
        });

        Self {
            base_url,
            peak,
            requests,
        }
    }

    /// The proxy application, pointed at this fake
    pub fn app(&self, fanout_limit: usize) -> Router {
        self.app_with_timeout(fanout_limit, Duration::from_secs(5))
    }

    pub fn app_with_timeout(&self, fanout_limit: usize, timeout: Duration) -> Router {
        let api = PokeApi::new(&self.base_url, timeout).expect("Fake upstream url is valid");
        router(AppState::new(Aggregator::new(api, fanout_limit)))
    }

    pub fn aggregator(&self, fanout_limit: usize) -> Aggregator {
        let api = PokeApi::new(&self.base_url, Duration::from_secs(5))
            .expect("Fake upstream url is valid");
        Aggregator::new(api, fanout_limit)
    }

    /// Most pokemon detail requests ever served at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn pokemon_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Sends a GET to the app and returns the status with the decoded body
pub async fn get_json(app: Router, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

/// Names of the pokemon in a success body
pub fn pokemon_names(body: &Value) -> Vec<String> {
    body["data"]["pokemon"]
        .as_array()
        .map(|pokemon| {
            pokemon
                .iter()
                .filter_map(|p| p["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

//
// Fake PokéApi handlers
//

fn find(id_or_name: &str) -> Option<&'static Dex> {
    ROSTER
        .iter()
        .find(|dex| dex.name == id_or_name || dex.id.to_string() == id_or_name)
}

fn resource(base_url: &str, kind: &str, id: i64, name: &str) -> Value {
    json!({ "name": name, "url": format!("{base_url}/{kind}/{id}/") })
}

fn pokemon_json(base_url: &str, id: i64, name: &str, types: &[&str]) -> Value {
    let types: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(slot, name)| {
            json!({
                "slot": slot + 1,
                "type": { "name": name, "url": format!("{base_url}/type/{name}/") }
            })
        })
        .collect();

    json!({
        "id": id,
        "name": name,
        "order": id,
        "base_experience": 64,
        "height": 7,
        "weight": 69,
        "abilities": [{ "ability": { "name": "overgrow", "url": "" }, "is_hidden": false, "slot": 1 }],
        "moves": [{ "move": { "name": "tackle", "url": "" }, "version_group_details": [] }],
        "stats": [{ "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "" } }],
        "game_indices": [],
        "held_items": [],
        "past_types": [],
        "sprites": {
            "front_default": format!("{base_url}/sprites/{id}.png"),
            "other": { "official-artwork": { "front_default": format!("{base_url}/artwork/{id}.png") } }
        },
        "types": types
    })
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn pokemon_list(State(state): State<FakeState>, Query(query): Query<ListQuery>) -> Json<Value> {
    let limit = query.limit.unwrap_or(20);
    let offset = query.offset.unwrap_or(0);

    let results: Vec<Value> = ROSTER
        .iter()
        .skip(offset)
        .take(limit)
        .map(|dex| resource(&state.base_url, "pokemon", dex.id, dex.name))
        .collect();

    Json(json!({
        "count": ROSTER.len(),
        "next": null,
        "previous": null,
        "results": results
    }))
}

async fn pokemon_detail(
    State(state): State<FakeState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.peak.fetch_max(now, Ordering::SeqCst);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let body = if id == BROKEN_POKEMON_ID.to_string() {
        Err(StatusCode::INTERNAL_SERVER_ERROR)
    } else if let Some(dex) = find(&id) {
        Ok(Json(pokemon_json(&state.base_url, dex.id, dex.name, dex.types)))
    } else {
        match id.parse::<i64>() {
            Ok(n) if NORMAL_TYPE_IDS.contains(&n) => Ok(Json(pokemon_json(
                &state.base_url,
                n,
                &format!("pokemon-{n}"),
                &["normal"],
            ))),
            _ => Err(StatusCode::NOT_FOUND),
        }
    };

    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    body
}

async fn species_detail(
    State(state): State<FakeState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let dex = find(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(json!({
        "id": dex.id,
        "name": dex.name,
        "order": SPECIES_ORDER_OFFSET + dex.id,
        "is_baby": false,
        "is_legendary": dex.legendary,
        "is_mythical": dex.mythical,
        "evolution_chain": { "url": format!("{}/evolution-chain/{}/", state.base_url, dex.chain) },
        "generation": { "name": "generation-i", "url": format!("{}/generation/1/", state.base_url) },
        "color": { "name": "green", "url": "" },
        "base_happiness": 50,
        "capture_rate": 45,
        "flavor_text_entries": [{ "flavor_text": "A strange seed was planted on its back at birth." }],
        "form_descriptions": [],
        "genera": [{ "genus": "Seed Pokémon" }],
        "names": [{ "name": dex.name }],
        "pal_park_encounters": [],
        "pokedex_numbers": [{ "entry_number": dex.id }],
        "varieties": [{ "is_default": true, "pokemon": resource(&state.base_url, "pokemon", dex.id, dex.name) }]
    })))
}

async fn type_detail(
    State(state): State<FakeState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let members: Vec<Value> = match id.as_str() {
        "normal" => NORMAL_TYPE_IDS
            .map(|n| resource(&state.base_url, "pokemon", n, &format!("pokemon-{n}")))
            .collect(),
        "broken" => vec![
            resource(&state.base_url, "pokemon", 1, "bulbasaur"),
            resource(&state.base_url, "pokemon", BROKEN_POKEMON_ID, "missingno"),
        ],
        name => ROSTER
            .iter()
            .filter(|dex| dex.types.contains(&name))
            .map(|dex| resource(&state.base_url, "pokemon", dex.id, dex.name))
            .collect(),
    };

    if members.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    let pokemon: Vec<Value> = members
        .into_iter()
        .map(|pokemon| json!({ "slot": 1, "pokemon": pokemon }))
        .collect();

    Ok(Json(json!({ "id": 1, "name": id, "pokemon": pokemon })))
}

async fn generation_detail(
    State(state): State<FakeState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if id != "1" && id != "generation-i" {
        return Err(StatusCode::NOT_FOUND);
    }

    let species: Vec<Value> = ROSTER
        .iter()
        .map(|dex| resource(&state.base_url, "pokemon-species", dex.id, dex.name))
        .collect();

    Ok(Json(json!({ "id": 1, "name": "generation-i", "pokemon_species": species })))
}

async fn evolution_chain(
    State(state): State<FakeState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    let link = |dex_id: i64, evolves_to: Vec<Value>| -> Value {
        let dex = ROSTER
            .iter()
            .find(|dex| dex.id == dex_id)
            .expect("Chain member is in the roster");
        json!({
            "is_baby": false,
            "species": resource(&state.base_url, "pokemon-species", dex.id, dex.name),
            "evolution_details": [],
            "evolves_to": evolves_to
        })
    };

    let chain = match id {
        1 => link(1, vec![link(2, vec![link(3, vec![])])]),
        2 => link(4, vec![link(5, vec![link(6, vec![])])]),
        67 => link(133, vec![link(134, vec![]), link(135, vec![]), link(136, vec![])]),
        72 => link(144, vec![]),
        78 => link(151, vec![]),
        _ => return Err(StatusCode::NOT_FOUND),
    };

    Ok(Json(json!({ "id": id, "baby_trigger_item": null, "chain": chain })))
}
