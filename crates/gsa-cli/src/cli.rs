use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gsa")]
#[command(about = "Search, suggest and feed Google Search Appliances", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new config file
    Init {
        /// Path for new config file
        #[arg(default_value = "gsa.toml")]
        path: PathBuf,
    },
    /// Start the HTTP gateway server
    Serve {
        /// Host to bind to (overrides [server].host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides [server].port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a search and print the hits
    Search(SearchArgs),
    /// Print query completions
    Suggest {
        /// Partial query
        query: String,
        /// System name from [systems]
        #[arg(long, short)]
        system: String,
        /// Collections to search
        #[arg(long)]
        collections: Option<String>,
        /// Front end name
        #[arg(long)]
        client: Option<String>,
        /// Maximum number of suggestions
        #[arg(long)]
        max: Option<u32>,
    },
    /// Push feeds to an appliance
    Feed {
        #[command(subcommand)]
        action: FeedCommands,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search term
    pub query: String,
    /// System name from [systems]
    #[arg(long, short)]
    pub system: String,
    /// Collections to search, combined with . (AND) or | (OR)
    #[arg(long)]
    pub collections: Option<String>,
    /// Front end name
    #[arg(long)]
    pub client: Option<String>,
    /// Access level: public, secure or all
    #[arg(long)]
    pub access: Option<String>,
    /// Number of hits per page
    #[arg(long)]
    pub num: Option<u32>,
    /// Zero-based offset of the first hit
    #[arg(long, default_value = "0")]
    pub start: u32,
    /// Required metadata, key:value tags separated by |
    #[arg(long)]
    pub required_fields: Option<String>,
    /// Partially matching metadata, key:value tags separated by |
    #[arg(long)]
    pub partial_fields: Option<String>,
    /// Print the whole result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum FeedCommands {
    /// Add or refresh urls, crawling them immediately
    Push(FeedArgs),
    /// Remove urls from the index
    Delete(FeedArgs),
}

#[derive(Args)]
pub struct FeedArgs {
    /// Urls to feed
    pub urls: Vec<String>,
    /// System name from [systems]
    #[arg(long, short)]
    pub system: String,
    /// JSON file with a list of feed records, sent as-is
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Print the feed document instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}
