// SPDX-License-Identifier: GPL-3.0-only

use serde::Serialize;
use serde_json::{Map, Value};

use super::upstream::ApiUrl;

/// An upstream species record without its verbose fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesSummary {
    pub id: i64,
    pub name: String,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub evolution_chain: Option<ApiUrl>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}
