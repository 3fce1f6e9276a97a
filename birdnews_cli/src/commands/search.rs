//! The `search` subcommand: sightings for a date range in taxonomic order.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use birdnews_lib::birdnews_api::Client;
use birdnews_lib::{search_with_progress, validation, CachedClient, DayCache, DayOutcome, Db};
use chrono::Local;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::commands::load_bird_list;
use crate::output::{
    print_json, print_report_csv, print_report_markdown, print_report_table, OutputFormat,
};

/// Arguments for the `search` subcommand.
#[derive(Args)]
pub struct SearchArgs {
    /// First day (YYYY-MM-DD). Defaults to the first day of last month
    #[arg(long)]
    pub from: Option<String>,

    /// Last day (YYYY-MM-DD). Defaults to the last day of last month
    #[arg(long)]
    pub to: Option<String>,

    /// SQLite cache path; the cache is kept in memory when unset
    #[arg(long, env = "BIRDNEWS_CACHE_DB")]
    pub db: Option<PathBuf>,

    /// YAML bird list to use instead of the built-in one
    #[arg(long, env = "BIRDNEWS_BIRDLIST")]
    pub birdlist: Option<PathBuf>,

    /// Site root to fetch pages from
    #[arg(long, env = "BIRDNEWS_BASE_URL", default_value = "https://www.goingbirding.co.uk")]
    pub base_url: String,

    /// County section of the site
    #[arg(long, env = "BIRDNEWS_REGION", default_value = "hants")]
    pub region: String,

    /// Seconds a fetched day stays cached
    #[arg(long, env = "BIRDNEWS_CACHE_TTL_SECS", default_value = "3600")]
    pub ttl_secs: u64,

    /// Request timeout in seconds
    #[arg(long, env = "BIRDNEWS_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// Resolves the query dates, falling back to last month's range.
fn resolve_dates(args: &SearchArgs) -> (String, String) {
    let (first, last) = validation::previous_month_range(Local::now().date_naive());
    let from = args
        .from
        .clone()
        .unwrap_or_else(|| first.format("%Y-%m-%d").to_string());
    let to = args
        .to
        .clone()
        .unwrap_or_else(|| last.format("%Y-%m-%d").to_string());
    (from, to)
}

pub async fn run(args: &SearchArgs, format: &OutputFormat) -> Result<()> {
    let (from, to) = resolve_dates(args);
    let total_days = birdnews_lib::search::range_len(&from, &to)?;
    let region = validation::validate_region(&args.region)?;

    let cache = match args.db {
        Some(ref path) => {
            let db = Db::open(path)?;
            db.init()?;
            DayCache::new(Arc::new(db))
        }
        None => DayCache::in_memory(),
    };
    let birds = Arc::new(load_bird_list(args.birdlist.as_deref())?);
    let inner = Client::with_options(&args.base_url, Duration::from_secs(args.timeout_secs))?;
    let client = CachedClient::new(inner, cache, birds)
        .with_ttl(Duration::from_secs(args.ttl_secs))
        .with_region(&region);

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total_days)
    };
    pb.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}",
    )?);

    let report = search_with_progress(&client, &from, &to, |day, outcome| {
        match outcome {
            DayOutcome::Fetched { sightings } => {
                pb.set_message(format!("{}: {} sightings", day, sightings))
            }
            DayOutcome::Skipped => pb.set_message(format!("{}: no data", day)),
        }
        pb.inc(1);
    })
    .await?;
    pb.finish_and_clear();

    eprintln!(
        "{} species recorded from {} to {}",
        report.species_count, report.from, report.to
    );
    if !report.skipped_days.is_empty() {
        let days: Vec<String> = report.skipped_days.iter().map(|d| d.to_string()).collect();
        eprintln!("No data for: {}", days.join(", "));
    }

    match format {
        OutputFormat::Table => print_report_table(&report),
        OutputFormat::Json => print_json(&report),
        OutputFormat::Csv => print_report_csv(&report)?,
        OutputFormat::Markdown => print_report_markdown(&report),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SearchArgs,
    }

    #[test]
    fn explicit_dates_are_kept() {
        let cli = TestCli::parse_from(["birdnews", "--from", "2020-02-20", "--to", "2020-02-21"]);
        assert_eq!(
            resolve_dates(&cli.args),
            ("2020-02-20".to_string(), "2020-02-21".to_string())
        );
    }

    #[test]
    fn missing_dates_default_to_last_month() {
        let cli = TestCli::parse_from(["birdnews"]);
        let (from, to) = resolve_dates(&cli.args);
        assert!(from.ends_with("-01"));
        assert!(from <= to);
        assert!(validation::validate_range(&from, &to).is_ok());
    }

    #[test]
    fn defaults() {
        let cli = TestCli::parse_from(["birdnews"]);
        assert_eq!(cli.args.region, "hants");
        assert_eq!(cli.args.ttl_secs, 3600);
        assert_eq!(cli.args.timeout_secs, 30);
    }
}
