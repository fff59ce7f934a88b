use crate::config::Config;
use anyhow::{Context, Result};
use gsa_search::{Endpoint, SearchServer, SuggestionQueryDescription};

pub async fn execute(
    query: String,
    system: String,
    collections: Option<String>,
    client: Option<String>,
    max: Option<u32>,
    config: &Config,
) -> Result<()> {
    let host = config.resolve(&system, Endpoint::Suggest)?;

    let mut description = SuggestionQueryDescription::new(host, query)
        .with_max_suggestions(max.unwrap_or(config.search.max_suggestions));
    description.base.collections = collections.unwrap_or_default();
    description.base.client = client.unwrap_or_else(|| config.search.client.clone());

    let suggestions = SearchServer::new()
        .suggest(&description)
        .await
        .context("Suggestion lookup failed")?;

    for suggestion in suggestions {
        println!("{}", suggestion);
    }
    Ok(())
}
