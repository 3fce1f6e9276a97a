//! The `cache` subcommand: housekeeping for the SQLite day cache.

use std::path::PathBuf;

use anyhow::Result;
use birdnews_lib::{CacheStore, Db};
use clap::Args;

#[derive(Args)]
pub struct CacheArgs {
    /// SQLite cache path
    #[arg(long, env = "BIRDNEWS_CACHE_DB", default_value = "birdnews.db")]
    pub db: PathBuf,

    /// Delete expired days
    #[arg(long)]
    pub purge_expired: bool,

    /// Delete every cached day
    #[arg(long, conflicts_with = "purge_expired")]
    pub clear: bool,
}

pub fn run(args: &CacheArgs) -> Result<()> {
    let db = Db::open(&args.db)?;
    db.init()?;

    if args.clear {
        db.clear()?;
        eprintln!("Cleared day cache at {}", args.db.display());
    } else if args.purge_expired {
        let removed = db.purge_expired()?;
        eprintln!("Removed {} expired day(s)", removed);
    }

    println!("{} cached day(s) in {}", db.cached_day_count()?, args.db.display());
    Ok(())
}
