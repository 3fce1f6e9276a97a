//! Date-range query: fetch each day, aggregate, order taxonomically.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::SpeciesIndex;
use crate::client::CachedClient;
use crate::error::BirdNewsError;
use crate::taxonomy::{taxonomic_order, SpeciesEntry};
use crate::validation::{days_in_range, validate_range};

/// Result of a range query, ready for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// Input dates echoed back as given.
    pub from: String,
    pub to: String,
    /// Distinct species recorded in the range.
    pub species_count: usize,
    /// Species in taxonomic order.
    pub records: Vec<SpeciesEntry>,
    /// Days whose page could not be fetched or parsed.
    pub skipped_days: Vec<NaiveDate>,
}

/// What happened to one day of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    Fetched { sightings: usize },
    Skipped,
}

/// Runs a range query for the ISO dates `from` and `to` (inclusive).
pub async fn search(
    client: &CachedClient,
    from: &str,
    to: &str,
) -> Result<SearchReport, BirdNewsError> {
    search_with_progress(client, from, to, |_, _| {}).await
}

/// Like [`search`], calling `on_day` after each day is processed.
///
/// Days are handled one at a time in date order. A day that fails to fetch
/// or parse is skipped; a cache failure aborts the whole query.
pub async fn search_with_progress<F>(
    client: &CachedClient,
    from: &str,
    to: &str,
    mut on_day: F,
) -> Result<SearchReport, BirdNewsError>
where
    F: FnMut(NaiveDate, DayOutcome),
{
    let (from_date, to_date) = validate_range(from, to)?;

    let mut index = SpeciesIndex::new();
    let mut skipped_days = Vec::new();

    for day in days_in_range(from_date, to_date) {
        match client.fetch_day(day).await {
            Ok(sightings) => {
                on_day(
                    day,
                    DayOutcome::Fetched {
                        sightings: sightings.len(),
                    },
                );
                index.extend(sightings);
            }
            Err(e) if e.is_day_local() => {
                tracing::error!(%day, error = %e, "no data for this day, skipping");
                skipped_days.push(day);
                on_day(day, DayOutcome::Skipped);
            }
            Err(e) => return Err(e),
        }
    }

    let species_count = index.species_count();
    tracing::info!("Number of species recorded: {}", species_count);

    let records = taxonomic_order(index, client.birds());
    tracing::info!("Number of species in taxonomic list: {}", records.len());

    Ok(SearchReport {
        from: from.to_string(),
        to: to.to_string(),
        species_count,
        records,
        skipped_days,
    })
}

/// Days in the inclusive range, for progress reporting.
pub fn range_len(from: &str, to: &str) -> Result<u64, BirdNewsError> {
    let (from_date, to_date) = validate_range(from, to)?;
    Ok(((to_date - from_date).num_days() + 1) as u64)
}
