use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::header::COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use gsa_search::{
    AuthCookie, Endpoint, Feed, FeedAction, FeedClient, FeedManager, FeedRecord, HttpFeedClient,
    MetaDataCombinator, MetaDataField, PushMode, QueryDescription, SearchAccess, SearchError,
    SearchResult, SearchServer, SuggestionQueryDescription, SystemHosts,
};
use percent_encoding::percent_decode_str;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::types::*;
use crate::usage::usage_middleware;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Which incoming cookie carries the caller's session, and how to
/// forward it to the appliance.
#[derive(Debug, Clone)]
pub struct AuthCookieSettings {
    pub name: String,
    pub http_only: bool,
    pub secure: bool,
    /// Expiry attached to the forwarded cookie, counted from the request.
    pub ttl: Option<Duration>,
}

impl AuthCookieSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            http_only: false,
            secure: false,
            ttl: None,
        }
    }

    /// Build the forwarded cookie from the incoming request headers.
    fn cookie_from(&self, headers: &HeaderMap) -> Option<AuthCookie> {
        let value = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == self.name).then(|| value.to_string())
            })?;

        Some(AuthCookie {
            name: self.name.clone(),
            value,
            domain: None,
            expires: self
                .ttl
                .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
                .map(|ttl| Utc::now() + ttl),
            http_only: self.http_only,
            secure: self.secure,
        })
    }
}

/// Values used when a request leaves a parameter out
#[derive(Debug, Clone)]
pub struct SearchDefaults {
    pub client: String,
    pub results_per_page: u32,
    pub max_suggestions: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            client: String::new(),
            results_per_page: 10,
            max_suggestions: 10,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search_server: Arc<SearchServer>,
    pub feed_client: Arc<dyn FeedClient>,
    pub systems: Arc<SystemHosts>,
    pub auth_cookie: Option<Arc<AuthCookieSettings>>,
    pub defaults: Arc<SearchDefaults>,
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// HTTP transports for both search and feeds, no cookie forwarding.
    pub fn new(systems: SystemHosts) -> Self {
        Self {
            search_server: Arc::new(SearchServer::new()),
            feed_client: Arc::new(HttpFeedClient::new()),
            systems: Arc::new(systems),
            auth_cookie: None,
            defaults: Arc::new(SearchDefaults::default()),
            allowed_origins: Vec::new(),
        }
    }

    pub fn with_search_server(mut self, server: SearchServer) -> Self {
        self.search_server = Arc::new(server);
        self
    }

    pub fn with_feed_client(mut self, client: Arc<dyn FeedClient>) -> Self {
        self.feed_client = client;
        self
    }

    pub fn with_auth_cookie(mut self, settings: AuthCookieSettings) -> Self {
        self.auth_cookie = Some(Arc::new(settings));
        self
    }

    pub fn with_defaults(mut self, defaults: SearchDefaults) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    fn resolve(&self, system: Option<&str>, endpoint: Endpoint) -> Result<String, ApiError> {
        let system = match system {
            Some(s) if !s.is_empty() => s,
            _ => return Err(bad_request("The s parameter must be specified")),
        };
        self.systems
            .resolve(system, endpoint)
            .ok_or_else(|| bad_request(format!("Unknown system '{}'", system)))
    }
}

/// Create the Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = if state.allowed_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(
                state
                    .allowed_origins
                    .iter()
                    .filter_map(|origin| match origin.parse() {
                        Ok(value) => Some(value),
                        Err(_) => {
                            warn!(origin = %origin, "Ignoring invalid CORS origin");
                            None
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/search", get(search))
        .route("/api/suggest", get(suggest))
        .route("/api/feed", post(push_feed).delete(delete_feed))
        .layer(middleware::from_fn(usage_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the gateway server
pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let router = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!(addr = %addr, "Starting gateway server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn search_error(e: SearchError) -> ApiError {
    match e {
        SearchError::InvalidArgument(msg) => bad_request(msg),
        other => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: other.to_string(),
            }),
        ),
    }
}

/// Split `key:value|key:value` into metadata constraints. Several tags are
/// ANDed together; a tag without `:` is a key with an empty value.
pub fn parse_field_tags(raw: &str) -> Vec<MetaDataField> {
    let combinator = if raw.contains('|') {
        MetaDataCombinator::And
    } else {
        MetaDataCombinator::Ignore
    };

    raw.split('|')
        .filter(|tag| !tag.is_empty())
        .map(|tag| {
            let (key, value) = tag.split_once(':').unwrap_or((tag, ""));
            MetaDataField::new(key, value).with_combinator(combinator)
        })
        .collect()
}

// --- REST Handlers ---

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResult>, ApiError> {
    let host = state.resolve(params.s.as_deref(), Endpoint::Search)?;

    let mut query = QueryDescription::new(host, params.q.unwrap_or_default());
    query.base.collections = params.collections.unwrap_or_default();
    query.base.client = params
        .client
        .unwrap_or_else(|| state.defaults.client.clone());
    if let Some(access) = params.access.as_deref() {
        query.base.access = access.parse::<SearchAccess>().map_err(search_error)?;
    }
    query.max_search_hits = params
        .results_per_page
        .unwrap_or(state.defaults.results_per_page);
    query.start = params.start.unwrap_or_default();
    if let Some(tags) = params.required_fields.as_deref() {
        query.required_fields = parse_field_tags(tags);
    }
    if let Some(tags) = params.partial_fields.as_deref() {
        query.partial_fields = parse_field_tags(tags);
    }

    let cookie = state
        .auth_cookie
        .as_ref()
        .and_then(|settings| settings.cookie_from(&headers));

    let result = state
        .search_server
        .search(&query, cookie.as_ref())
        .await
        .map_err(search_error)?;
    Ok(Json(result))
}

async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let host = state.resolve(params.s.as_deref(), Endpoint::Suggest)?;

    let mut query = SuggestionQueryDescription::new(host, params.q.unwrap_or_default())
        .with_max_suggestions(
            params
                .max_suggestions
                .unwrap_or(state.defaults.max_suggestions),
        );
    query.base.collections = params.collections.unwrap_or_default();
    query.base.client = params
        .client
        .unwrap_or_else(|| state.defaults.client.clone());

    let suggestions = state
        .search_server
        .suggest(&query)
        .await
        .map_err(search_error)?;
    Ok(Json(suggestions))
}

async fn push_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<(StatusCode, Json<FeedResponse>), ApiError> {
    let (url, host) = feed_target(&state, &params)?;
    let record = FeedRecord::new(url).crawl_immediately();
    submit_feed(&state, host, record).await
}

async fn delete_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<(StatusCode, Json<FeedResponse>), ApiError> {
    let (url, host) = feed_target(&state, &params)?;
    let record = FeedRecord::new(url).with_action(FeedAction::Delete);
    submit_feed(&state, host, record).await
}

/// Decoded record url and feed host for a feed request.
fn feed_target(state: &AppState, params: &FeedParams) -> Result<(String, String), ApiError> {
    let raw = match params.u.as_deref() {
        Some(u) if !u.is_empty() => u,
        _ => return Err(bad_request("The u parameter must be a valid url")),
    };
    let host = state.resolve(params.s.as_deref(), Endpoint::Feed)?;

    // `u` arrives encoded inside an already decoded query string.
    let url = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| bad_request("The u parameter must be a valid url"))?
        .into_owned();

    Ok((url, host))
}

async fn submit_feed(
    state: &AppState,
    host: String,
    record: FeedRecord,
) -> Result<(StatusCode, Json<FeedResponse>), ApiError> {
    let url = record.url.clone();
    let manager = FeedManager::new(host).with_client(state.feed_client.clone());

    let status = manager
        .push(&Feed::new(vec![record]), PushMode::Wait)
        .await
        .map_err(search_error)?;

    Ok((
        status,
        Json(FeedResponse {
            url,
            status: status.as_u16(),
        }),
    ))
}
