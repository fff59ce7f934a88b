use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::query::{QueryDescription, SuggestionQueryDescription};
use crate::result::{decode_results, SearchResult};
use crate::suggest::decode_suggestions;
use crate::transport::{AuthCookie, HttpSearchTransport, SearchTransport};

pub const TRANSPORT_ERROR: &str = "Server error occurred while loading XML";

/// Runs searches and suggestion lookups against the appliance.
#[derive(Clone)]
pub struct SearchServer {
    transport: Arc<dyn SearchTransport>,
}

impl Default for SearchServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchServer {
    pub fn new() -> Self {
        Self {
            transport: Arc::new(HttpSearchTransport::new()),
        }
    }

    pub fn with_transport(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }

    /// Search with nothing but a term and the appliance search endpoint.
    pub async fn search_term(&self, term: &str, host_address: &str) -> Result<SearchResult> {
        self.search(&QueryDescription::new(host_address, term), None)
            .await
    }

    /// Run `query`. Only a missing host address is returned as an error;
    /// transport and protocol failures end up in `SearchResult::error`.
    ///
    /// `auth_cookie` is forwarded only for secure and all-access searches.
    pub async fn search(
        &self,
        query: &QueryDescription,
        auth_cookie: Option<&AuthCookie>,
    ) -> Result<SearchResult> {
        let url = query.encode()?;

        let mut cookies = Vec::new();
        if query.base.access.needs_credentials() {
            if let Some(cookie) = auth_cookie {
                let mut cookie = cookie.clone();
                if cookie.domain.is_none() {
                    cookie.domain = Some(query.domain()?);
                }
                cookies.push(cookie);
            }
        }

        let body = match self.transport.fetch(&url, &cookies).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, url = %url, "Search request failed");
                return Ok(SearchResult::failed(TRANSPORT_ERROR));
            }
        };

        let result = decode_results(&body);
        debug!(
            hits = result.search_hits.len(),
            error = %result.error,
            "Decoded search response"
        );
        Ok(result)
    }

    /// Completions for a partial term. Failures yield an empty list.
    pub async fn suggest(&self, query: &SuggestionQueryDescription) -> Result<Vec<String>> {
        let url = query.encode()?;

        match self.transport.fetch(&url, &[]).await {
            Ok(body) => Ok(decode_suggestions(&body)),
            Err(e) => {
                warn!(error = %e, url = %url, "Suggestion request failed");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::wire::SearchAccess;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned body (or a transport error) and remembers each call.
    struct CannedTransport {
        body: Option<String>,
        calls: Mutex<Vec<(String, Vec<AuthCookie>)>>,
    }

    impl CannedTransport {
        fn answering(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Some(body.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                body: None,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchTransport for CannedTransport {
        async fn fetch(&self, url: &str, cookies: &[AuthCookie]) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), cookies.to_vec()));
            self.body
                .clone()
                .ok_or_else(|| SearchError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_search_decodes_body() {
        let transport = CannedTransport::answering(r#"<GSP VER="3.2"><TM>0.1</TM></GSP>"#);
        let server = SearchServer::with_transport(transport.clone());

        let result = server
            .search_term("apa", "http://gsa.example.com/search")
            .await
            .unwrap();
        assert!(!result.is_error());
        assert_eq!(result.version, "3.2");

        let calls = transport.calls.lock().unwrap();
        assert!(calls[0].0.starts_with("http://gsa.example.com/search?q=apa"));
        assert!(calls[0].1.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_sets_error() {
        let server = SearchServer::with_transport(CannedTransport::failing());
        let result = server
            .search_term("apa", "http://gsa.example.com/search")
            .await
            .unwrap();
        assert_eq!(result.error, TRANSPORT_ERROR);
        assert!(result.search_hits.is_empty());
    }

    #[tokio::test]
    async fn test_missing_host_is_an_error() {
        let server = SearchServer::with_transport(CannedTransport::failing());
        assert!(matches!(
            server.search_term("apa", "").await,
            Err(SearchError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_cookie_forwarded_only_for_secure_access() {
        let transport = CannedTransport::answering("<GSP VER=\"3.2\"/>");
        let server = SearchServer::with_transport(transport.clone());
        let cookie = AuthCookie::new(".ASPXAUTH", "token");

        let mut query = QueryDescription::new("http://gsa.example.com/search", "apa");
        query.base.access = SearchAccess::Public;
        server.search(&query, Some(&cookie)).await.unwrap();

        query.base.access = SearchAccess::Secure;
        server.search(&query, Some(&cookie)).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert!(calls[0].1.is_empty());
        assert_eq!(calls[1].1.len(), 1);
        assert_eq!(calls[1].1[0].domain.as_deref(), Some("gsa.example.com"));
    }

    #[tokio::test]
    async fn test_suggest_failure_is_empty() {
        let server = SearchServer::with_transport(CannedTransport::failing());
        let query = SuggestionQueryDescription::new("http://gsa.example.com/suggest", "le");
        assert!(server.suggest(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_decodes_names() {
        let transport =
            CannedTransport::answering(r#"{"query":"le","results":[{"name":"ledig","type":"suggest"}]}"#);
        let server = SearchServer::with_transport(transport.clone());
        let query = SuggestionQueryDescription::new("http://gsa.example.com/suggest", "le");

        assert_eq!(server.suggest(&query).await.unwrap(), vec!["ledig"]);
        assert!(transport.calls.lock().unwrap()[0].0.ends_with("&format=rich"));
    }
}
