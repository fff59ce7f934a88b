use serde::{Deserialize, Serialize};

/// Query string of `GET /api/search`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub s: Option<String>,
    pub collections: Option<String>,
    pub client: Option<String>,
    pub results_per_page: Option<u32>,
    /// `|`-separated `key:value` tags
    pub required_fields: Option<String>,
    #[serde(rename = "partialfields")]
    pub partial_fields: Option<String>,
    pub access: Option<String>,
    pub start: Option<u32>,
}

/// Query string of `GET /api/suggest`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestParams {
    pub q: Option<String>,
    pub s: Option<String>,
    pub collections: Option<String>,
    pub client: Option<String>,
    pub max_suggestions: Option<u32>,
}

/// Query string of `POST /api/feed` and `DELETE /api/feed`
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    /// Percent-encoded URL of the page to feed
    pub u: Option<String>,
    pub s: Option<String>,
}

/// Feed submission outcome
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub url: String,
    pub status: u16,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
