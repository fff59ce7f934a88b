use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::cookie::Jar;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{Result, SearchError};

/// A session cookie forwarded to the appliance on secure searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthCookie {
    pub name: String,
    pub value: String,
    /// Cookie domain; the appliance host is used when `None`.
    pub domain: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub http_only: bool,
    pub secure: bool,
}

impl AuthCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// `Set-Cookie` form, scoped to the root path.
    pub fn to_set_cookie(&self) -> String {
        let mut out = format!("{}={}; Path=/", self.name, self.value);
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        if let Some(expires) = &self.expires {
            out.push_str("; Expires=");
            out.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Fetches a response body from the appliance.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// GET `url`, seeding the session with `cookies`, and return the final body.
    async fn fetch(&self, url: &str, cookies: &[AuthCookie]) -> Result<String>;
}

/// HTTP transport that follows redirects itself so session cookies set on
/// intermediate hops reach the final request.
///
/// Redirects are followed without limit.
#[derive(Debug, Clone, Default)]
pub struct HttpSearchTransport;

impl HttpSearchTransport {
    pub fn new() -> Self {
        Self
    }

    fn session_client(jar: Arc<Jar>) -> Result<Client> {
        Ok(Client::builder()
            .redirect(Policy::none())
            .cookie_provider(jar)
            .build()?)
    }
}

#[async_trait]
impl SearchTransport for HttpSearchTransport {
    async fn fetch(&self, url: &str, cookies: &[AuthCookie]) -> Result<String> {
        let mut current = Url::parse(url)
            .map_err(|e| SearchError::Transport(format!("invalid url '{}': {}", url, e)))?;

        let jar = Arc::new(Jar::default());
        for cookie in cookies {
            jar.add_cookie_str(&cookie.to_set_cookie(), &current);
        }
        let client = Self::session_client(jar.clone())?;

        loop {
            let response = client.get(current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(location) = response.headers().get(LOCATION) {
                    let location = location
                        .to_str()
                        .map_err(|e| SearchError::Transport(format!("bad Location header: {}", e)))?;
                    let next = current.join(location).map_err(|e| {
                        SearchError::Transport(format!("bad redirect target '{}': {}", location, e))
                    })?;

                    // The appliance's login hop scopes its cookies to a
                    // sub-path; re-add them at the root so the redirect
                    // target receives them.
                    for cookie in response.cookies() {
                        jar.add_cookie_str(
                            &format!("{}={}; Path=/", cookie.name(), cookie.value()),
                            &current,
                        );
                    }

                    debug!(from = %current, to = %next, status = %status, "Following redirect");
                    current = next;
                    continue;
                }
            }

            if !status.is_success() {
                return Err(SearchError::Transport(format!(
                    "appliance answered {} for {}",
                    status, current
                )));
            }

            return Ok(response.text().await?);
        }
    }
}
