use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::commands::load_bird_list;
use crate::output::{print_birdlist_csv, print_birdlist_markdown, print_birdlist_table, print_json, OutputFormat};

#[derive(Args)]
pub struct BirdlistArgs {
    /// YAML bird list to print instead of the built-in one
    #[arg(long, env = "BIRDNEWS_BIRDLIST")]
    pub birdlist: Option<PathBuf>,

    /// Only show species whose name contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,
}

pub fn run(args: &BirdlistArgs, format: &OutputFormat) -> Result<()> {
    let birds = load_bird_list(args.birdlist.as_deref())?;
    let names = filter_names(birds.snapshot(), args.filter.as_deref());

    eprintln!("{} species", names.len());

    match format {
        OutputFormat::Table => print_birdlist_table(&names),
        OutputFormat::Json => print_json(&names),
        OutputFormat::Csv => print_birdlist_csv(&names)?,
        OutputFormat::Markdown => print_birdlist_markdown(&names),
    }

    Ok(())
}

fn filter_names(names: Vec<String>, filter: Option<&str>) -> Vec<String> {
    match filter {
        Some(needle) => {
            let needle = needle.to_lowercase();
            names
                .into_iter()
                .filter(|name| name.to_lowercase().contains(&needle))
                .collect()
        }
        None => names,
    }
}
