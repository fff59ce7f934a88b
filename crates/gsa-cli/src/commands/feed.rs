use crate::cli::FeedArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use gsa_search::{Endpoint, Feed, FeedAction, FeedManager, FeedRecord, PushMode};
use tracing::info;

pub async fn execute(args: FeedArgs, action: FeedAction, config: &Config) -> Result<()> {
    let feed = build_feed(&args, action)?;

    if args.dry_run {
        println!("{}", feed.to_xml()?);
        return Ok(());
    }

    let host = config.resolve(&args.system, Endpoint::Feed)?;
    info!(host = %host, records = feed.records.len(), "Pushing feed");

    let status = FeedManager::new(host)
        .push(&feed, PushMode::Wait)
        .await
        .context("Feed rejected before sending")?;

    if !status.is_success() {
        anyhow::bail!("Appliance answered {}", status);
    }
    println!("Feed accepted ({} records)", feed.records.len());
    Ok(())
}

/// Records from `--file` first, then one record per url argument.
fn build_feed(args: &FeedArgs, action: FeedAction) -> Result<Feed> {
    let mut feed = Feed::default();

    if let Some(file) = &args.file {
        let path = shellexpand::tilde(&file.to_string_lossy()).to_string();
        let content = std::fs::read_to_string(&path)
            .context(format!("Failed to read feed file: {:?}", path))?;
        let records: Vec<FeedRecord> =
            serde_json::from_str(&content).context("Failed to parse feed records JSON")?;
        feed.records.extend(records);
    }

    for url in &args.urls {
        let record = match action {
            FeedAction::Delete => FeedRecord::new(url.as_str()).with_action(FeedAction::Delete),
            _ => FeedRecord::new(url.as_str()).crawl_immediately(),
        };
        feed.push(record);
    }

    if feed.is_empty() {
        anyhow::bail!("Nothing to feed: give one or more urls or --file");
    }
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(urls: &[&str], file: Option<PathBuf>) -> FeedArgs {
        FeedArgs {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            system: "intranet".into(),
            file,
            dry_run: true,
        }
    }

    #[test]
    fn test_push_records_crawl_immediately() {
        let feed = build_feed(&args(&["http://a/", "http://b/"], None), FeedAction::Ignore).unwrap();
        assert_eq!(feed.records.len(), 2);
        assert!(feed.records.iter().all(|r| r.crawl_immediately));
        assert_eq!(feed.records[1].url, "http://b/");
    }

    #[test]
    fn test_delete_records() {
        let feed = build_feed(&args(&["http://a/"], None), FeedAction::Delete).unwrap();
        assert_eq!(feed.records[0].action, FeedAction::Delete);
        assert!(!feed.records[0].crawl_immediately);
    }

    #[test]
    fn test_records_from_file_come_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.json");
        std::fs::write(
            &path,
            r#"[{"url": "http://file/", "display_url": "http://shown/", "lock": true}]"#,
        )
        .unwrap();

        let feed = build_feed(&args(&["http://arg/"], Some(path)), FeedAction::Ignore).unwrap();
        assert_eq!(feed.records.len(), 2);
        assert_eq!(feed.records[0].url, "http://file/");
        assert_eq!(feed.records[0].display_url.as_deref(), Some("http://shown/"));
        assert!(feed.records[0].lock);
        assert_eq!(feed.records[1].url, "http://arg/");
    }

    #[test]
    fn test_empty_feed_is_rejected() {
        assert!(build_feed(&args(&[], None), FeedAction::Ignore).is_err());
    }
}
