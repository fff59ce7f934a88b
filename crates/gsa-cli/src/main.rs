mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, FeedCommands};
use gsa_search::FeedAction;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    gsa_search::init_logging();

    let cli = Cli::parse();

    // Handle init command early (doesn't need config)
    if let Commands::Init { path } = &cli.command {
        return commands::init::run_init(path);
    }

    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Serve { host, port } => {
            commands::serve::execute(host, port, &config).await?;
        }
        Commands::Search(args) => {
            commands::search::execute(args, &config).await?;
        }
        Commands::Suggest {
            query,
            system,
            collections,
            client,
            max,
        } => {
            commands::suggest::execute(query, system, collections, client, max, &config).await?;
        }
        Commands::Feed { action } => match action {
            FeedCommands::Push(args) => {
                commands::feed::execute(args, FeedAction::Ignore, &config).await?;
            }
            FeedCommands::Delete(args) => {
                commands::feed::execute(args, FeedAction::Delete, &config).await?;
            }
        },
    }

    Ok(())
}
