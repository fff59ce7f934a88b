use serde::{Deserialize, Serialize};

use super::{push_non_empty, push_param};
use crate::error::{Result, SearchError};
use crate::wire::SearchAccess;

/// Fields shared by full search queries and suggestion queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseQuery {
    /// Appliance endpoint, e.g. `http://gsa.example.com/search`. No trailing slash.
    pub host_address: String,
    /// Term as entered by the user (`q`).
    pub search_term: String,
    pub access: SearchAccess,
    /// Front end name (`client`).
    pub client: String,
    /// Collections to search, combined with `.` (AND) or `|` (OR) (`site`).
    pub collections: String,
}

impl BaseQuery {
    pub fn new(host_address: impl Into<String>, search_term: impl Into<String>) -> Self {
        Self {
            host_address: host_address.into(),
            search_term: search_term.into(),
            ..Default::default()
        }
    }

    /// Host, term, access, client and collection: the common URL prefix.
    pub fn encode_prefix(&self) -> Result<String> {
        if self.host_address.is_empty() {
            return Err(SearchError::invalid("a host address must be specified"));
        }

        let mut url = String::with_capacity(self.host_address.len() + 64);
        url.push_str(&self.host_address);
        url.push_str("?q=");
        url.push_str(&self.search_term);

        if let Some(token) = self.access.wire_token() {
            push_param(&mut url, "access", token);
        }
        push_non_empty(&mut url, "client", &self.client);
        push_non_empty(&mut url, "site", &self.collections);

        Ok(url)
    }

    /// DNS host of the appliance address, used as the domain of forwarded cookies.
    pub fn domain(&self) -> Result<String> {
        let url = reqwest::Url::parse(&self.host_address)
            .map_err(|e| SearchError::invalid(format!("host address is not a URL: {}", e)))?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| SearchError::invalid("host address has no host"))
    }
}
