use std::sync::Arc;

use reqwest::StatusCode;

use super::client::{FeedClient, HttpFeedClient, PushMode};
use super::document::Feed;
use crate::error::{Result, SearchError};

/// Validates and pushes feeds to one appliance.
#[derive(Clone)]
pub struct FeedManager {
    host_address: String,
    client: Arc<dyn FeedClient>,
}

impl FeedManager {
    /// `host_address` is the appliance base address without port or trailing slash.
    pub fn new(host_address: impl Into<String>) -> Self {
        Self {
            host_address: host_address.into(),
            client: Arc::new(HttpFeedClient::new()),
        }
    }

    pub fn with_client(mut self, client: Arc<dyn FeedClient>) -> Self {
        self.client = client;
        self
    }

    pub fn host_address(&self) -> &str {
        &self.host_address
    }

    /// Render and submit `feed`.
    ///
    /// Input problems (no host, no records, a record without url) fail with
    /// `InvalidArgument` before any network activity. Everything after that
    /// is reported as a status code.
    pub async fn push(&self, feed: &Feed, mode: PushMode) -> Result<StatusCode> {
        if self.host_address.is_empty() {
            return Err(SearchError::invalid("a host address must be specified"));
        }
        if feed.is_empty() {
            return Err(SearchError::invalid("a feed must contain at least one record"));
        }

        let xml = feed.to_xml()?;
        Ok(self.client.push_feed(xml, &self.host_address, mode).await)
    }
}
