use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base::BaseQuery;
use super::push_param;
use crate::error::Result;

/// Request for query completions from the appliance's suggest endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionQueryDescription {
    #[serde(flatten)]
    pub base: BaseQuery,
    /// Upper bound on returned suggestions; `0` leaves it to the appliance.
    pub max_suggestions: u32,
}

impl SuggestionQueryDescription {
    pub fn new(host_address: impl Into<String>, search_term: impl Into<String>) -> Self {
        Self {
            base: BaseQuery::new(host_address, search_term),
            max_suggestions: 0,
        }
    }

    pub fn with_max_suggestions(mut self, max: u32) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Build the suggest URL. The response is always requested in the
    /// `rich` JSON shape, the only one the decoder understands.
    pub fn encode(&self) -> Result<String> {
        let mut url = self.base.encode_prefix()?;

        if self.max_suggestions > 0 {
            push_param(&mut url, "max", &self.max_suggestions.to_string());
        }
        push_param(&mut url, "format", "rich");

        debug!(url = %url, "Encoded suggestion query");
        Ok(url)
    }
}
