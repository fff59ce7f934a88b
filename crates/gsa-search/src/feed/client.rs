use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::document::{FEED_DATASOURCE, FEED_TYPE};

/// Port of the appliance's feed listener.
pub const FEED_PORT: u16 = 19900;

/// How a feed submission waits for the appliance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PushMode {
    /// Wait for the appliance's answer and report its status.
    #[default]
    Wait,
    /// Submit in the background and report `200 OK` at once. The returned
    /// status says nothing about delivery.
    Detached,
}

/// Delivers rendered feed XML to an appliance.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Never fails: transport problems become an HTTP status.
    async fn push_feed(&self, xml: String, host_address: &str, mode: PushMode) -> StatusCode;
}

/// Posts feeds to `<host>:19900/xmlfeed` as a form submission.
#[derive(Clone)]
pub struct HttpFeedClient {
    client: Client,
    port: u16,
}

impl Default for HttpFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFeedClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            port: FEED_PORT,
        }
    }

    /// Use a preconfigured client (timeouts, proxies, TLS).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Feed listener port, for appliances not listening on 19900.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn feed_url(&self, host_address: &str) -> String {
        format!("{}:{}/xmlfeed", host_address.trim_end_matches('/'), self.port)
    }

    fn request(&self, xml: String, host_address: &str) -> reqwest::RequestBuilder {
        let form = [
            ("feedtype", FEED_TYPE.to_string()),
            ("datasource", FEED_DATASOURCE.to_string()),
            ("data", xml),
        ];
        self.client.post(self.feed_url(host_address)).form(&form)
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn push_feed(&self, xml: String, host_address: &str, mode: PushMode) -> StatusCode {
        let request = self.request(xml, host_address);

        match mode {
            PushMode::Wait => {
                let status = send(request).await;
                info!(host = host_address, status = %status, "Feed submitted");
                status
            }
            PushMode::Detached => {
                let host = host_address.to_string();
                tokio::spawn(async move {
                    let status = send(request).await;
                    debug!(host = %host, status = %status, "Detached feed submission finished");
                });
                info!(host = host_address, "Feed submitted in background");
                StatusCode::OK
            }
        }
    }
}

/// Appliance error statuses pass through unchanged; anything that never
/// produced a response becomes `500`.
async fn send(request: reqwest::RequestBuilder) -> StatusCode {
    match request.send().await {
        Ok(response) if response.status().is_success() => StatusCode::OK,
        Ok(response) => {
            warn!(status = %response.status(), "Appliance rejected feed");
            response.status()
        }
        Err(e) => {
            warn!(error = %e, "Feed transport failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_uses_listener_port() {
        let client = HttpFeedClient::new();
        assert_eq!(
            client.feed_url("http://gsa.example.com"),
            "http://gsa.example.com:19900/xmlfeed"
        );
        assert_eq!(
            client.with_port(8080).feed_url("http://gsa.example.com/"),
            "http://gsa.example.com:8080/xmlfeed"
        );
    }
}
