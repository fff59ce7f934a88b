//! Adapter between typed search/feed descriptions and the Google Search
//! Appliance wire formats: query URLs, XML results, JSON suggestions and
//! XML feeds.

pub mod error;
pub mod feed;
pub mod hosts;
pub mod query;
pub mod result;
pub mod server;
pub mod suggest;
pub mod transport;
pub mod wire;

pub use error::{Result, SearchError};
pub use feed::{Feed, FeedClient, FeedManager, FeedRecord, HttpFeedClient, PushMode};
pub use hosts::{Endpoint, SystemHosts};
pub use query::{BaseQuery, MetaDataField, QueryDescription, SuggestionQueryDescription};
pub use result::{
    decode_results, Facet, FacetItem, KeyMatch, ResultParameter, SearchHit, SearchResult,
};
pub use server::SearchServer;
pub use suggest::decode_suggestions;
pub use transport::{AuthCookie, HttpSearchTransport, SearchTransport};
pub use wire::{
    FacetType, FeedAction, FeedAuthMethod, MetaDataCombinator, QueryExpansion, QueryFilter,
    RelevanceScoring, SearchAccess, SearchLocation, SiteSearchModification,
};

pub use reqwest::StatusCode;

/// Initialize structured JSON logging on stderr, filtered by `RUST_LOG`
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
