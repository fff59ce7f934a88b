use crate::cli::SearchArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use gsa_gateway::server::parse_field_tags;
use gsa_search::{Endpoint, QueryDescription, SearchAccess, SearchResult, SearchServer};
use tracing::info;

pub async fn execute(args: SearchArgs, config: &Config) -> Result<()> {
    let query = build_query(&args, config)?;
    info!(system = %args.system, term = %args.query, "Running search");

    let result = SearchServer::new()
        .search(&query, None)
        .await
        .context("Search failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if result.is_error() {
        anyhow::bail!("Search failed: {}", result.error);
    }

    print!("{}", render(&result));
    Ok(())
}

fn build_query(args: &SearchArgs, config: &Config) -> Result<QueryDescription> {
    let host = config.resolve(&args.system, Endpoint::Search)?;

    let mut query = QueryDescription::new(host, args.query.clone());
    query.base.collections = args.collections.clone().unwrap_or_default();
    query.base.client = args
        .client
        .clone()
        .unwrap_or_else(|| config.search.client.clone());
    if let Some(access) = &args.access {
        query.base.access = access.parse::<SearchAccess>()?;
    }
    query.max_search_hits = args.num.unwrap_or(config.search.results_per_page);
    query.start = args.start;
    if let Some(tags) = &args.required_fields {
        query.required_fields = parse_field_tags(tags);
    }
    if let Some(tags) = &args.partial_fields {
        query.partial_fields = parse_field_tags(tags);
    }

    Ok(query)
}

/// Plain-text listing: key matches, hits, then spelling suggestions.
fn render(result: &SearchResult) -> String {
    let mut out = format!(
        "About {} results ({} seconds)\n",
        result.number_of_hits, result.execution_time
    );

    for key_match in &result.key_matches {
        out.push_str(&format!("* {}\n  {}\n", key_match.description, key_match.url));
    }
    for hit in &result.search_hits {
        out.push_str(&format!("{:>3}. {}\n     {}\n", hit.index, hit.title, hit.url));
    }
    if let Some(suggestion) = result.spelling_suggestions.first() {
        out.push_str(&format!("Did you mean: {}\n", suggestion));
    }

    out
}
