mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "birdnews")]
#[command(about = "Summarise Going Birding sightings by species and site")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sightings for a date range in taxonomic order
    Search(commands::search::SearchArgs),
    /// Print the taxonomic bird list
    Birdlist(commands::birdlist::BirdlistArgs),
    /// Inspect or clear the SQLite day cache
    Cache(commands::cache::CacheArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("birdnews=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::parse(&cli.output);

    match &cli.command {
        Commands::Search(args) => commands::search::run(args, &format).await?,
        Commands::Birdlist(args) => commands::birdlist::run(args, &format)?,
        Commands::Cache(args) => commands::cache::run(args)?,
    }

    Ok(())
}
