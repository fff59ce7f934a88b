pub mod client;
pub mod document;
pub mod manager;
pub mod record;

pub use client::{FeedClient, HttpFeedClient, PushMode, FEED_PORT};
pub use document::Feed;
pub use manager::FeedManager;
pub use record::FeedRecord;
