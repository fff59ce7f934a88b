use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::wire::FacetType;

/// Decoded appliance response.
///
/// `error` is non-empty exactly when the call failed; every other field is
/// then left at its default. List fields are always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Server-side search time in seconds, as reported (`TM`).
    pub execution_time: String,
    /// The query as the appliance understood it (`Q`).
    pub query: String,
    /// Protocol version (`VER`).
    pub version: String,
    /// Estimated total number of hits (`RES/M`).
    pub number_of_hits: i64,
    /// Filtering explanation (`RES/FI`).
    pub filtering: String,
    pub next_url: String,
    pub previous_url: String,
    pub search_hits: Vec<SearchHit>,
    pub key_matches: Vec<KeyMatch>,
    pub spelling_suggestions: Vec<String>,
    pub synonyms: Vec<String>,
    pub facets: Vec<Facet>,
    pub parameters: Vec<ResultParameter>,
    pub error: String,
}

impl SearchResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// One organic result (`RES/R`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based position in the overall result set.
    pub index: i64,
    pub url: String,
    /// URL as escaped by the appliance (`UE`).
    pub encoded_url: String,
    pub title: String,
    pub rating: i32,
    pub snippet: String,
    pub mime_type: String,
    /// Cached document size, e.g. `"12k"`.
    pub size: String,
    pub meta_tags: HashMap<String, String>,
}

/// An editorially pinned result (`GM`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMatch {
    pub url: String,
    pub description: String,
}

/// A request parameter echoed by the appliance (`PARAM`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultParameter {
    pub name: String,
    pub value: String,
    pub original_value: String,
}

/// A dynamic navigation group (`PARM/PMT`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub meta_name: String,
    pub display_name: String,
    pub is_range: bool,
    pub facet_type: FacetType,
    pub facet_items: Vec<FacetItem>,
}

/// One bucket of a facet (`PV`). Range facets use `low_range`/`high_range`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetItem {
    pub value: String,
    pub low_range: String,
    pub high_range: String,
    pub count: i64,
    /// Meta name of the owning facet.
    pub meta_name: String,
}
