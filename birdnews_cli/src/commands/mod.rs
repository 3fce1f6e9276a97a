//! CLI subcommand implementations.

pub mod birdlist;
pub mod cache;
pub mod search;

use anyhow::{Context, Result};
use birdnews_lib::BirdList;

/// Bird list from `path`, or the embedded default.
pub fn load_bird_list(path: Option<&std::path::Path>) -> Result<BirdList> {
    match path {
        Some(path) => BirdList::load_file(path)
            .with_context(|| format!("loading bird list from {}", path.display())),
        None => Ok(BirdList::load_default()?),
    }
}
