//! Parser for a day's bird news results table.
//!
//! The page lists every sighting as two consecutive `<tr>` rows after a
//! header row:
//!
//! - odd rows: date, species, site, count, observer
//! - even rows: time, notes
//!
//! Rows are told apart by cell count, so a missing time/notes row costs one
//! sighting instead of shifting every later pair. Header rows (no `<td>`)
//! are ignored.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::birdlist::BirdList;
use crate::types::Sighting;

const DETAIL_CELLS: usize = 5;
const TIME_CELLS: usize = 2;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid selector {0}")]
    Selector(String),
    #[error("invalid date '{0}', expected dd/mm/yy")]
    InvalidDate(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    MissingCells {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Fields of an odd (detail) row waiting for its time/notes row.
struct DetailRow {
    row: usize,
    date: String,
    species: String,
    site: String,
    count: String,
    observer: String,
}

/// Parses one day's page into sightings, in page order.
///
/// A row's kind comes from its cell count: five or more cells is a detail
/// row, exactly two is a time/notes row. Parity is only used to flag pages
/// that have drifted out of step. Species missing from `birds` are added to
/// it once their sighting is complete. Rows that fail to parse are skipped;
/// only an unusable selector fails the page.
pub fn parse_day_page(html: &str, birds: &BirdList) -> Result<Vec<Sighting>, ParseError> {
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let document = Html::parse_document(html);

    let mut sightings = Vec::new();
    let mut pending: Option<DetailRow> = None;

    for (index, row) in document.select(&row_selector).enumerate() {
        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();

        if cells.len() >= DETAIL_CELLS {
            if index % 2 == 0 {
                tracing::debug!(row = index, "detail row at even index");
            }
            if let Some(orphan) = pending.take() {
                tracing::warn!(
                    row = orphan.row,
                    species = %orphan.species,
                    "detail row has no time/notes row, dropping"
                );
            }
            match parse_detail_row(index, &cells) {
                Ok(detail) => pending = Some(detail),
                Err(e) => tracing::debug!(row = index, error = %e, "skipping row"),
            }
        } else if cells.len() == TIME_CELLS {
            let Some(detail) = pending.take() else {
                tracing::debug!(row = index, "time/notes row without detail row, skipping");
                continue;
            };
            birds.add_if_absent(&detail.species);
            sightings.push(Sighting {
                date: detail.date,
                time: cells[0].clone(),
                species: detail.species,
                site: detail.site,
                count: detail.count,
                observer: detail.observer,
                notes: cells[1].clone(),
            });
        } else if !cells.is_empty() {
            let err = ParseError::MissingCells {
                row: index,
                expected: DETAIL_CELLS,
                found: cells.len(),
            };
            tracing::debug!(row = index, error = %err, "skipping row");
        }
    }

    if let Some(orphan) = pending {
        tracing::warn!(
            row = orphan.row,
            species = %orphan.species,
            "last detail row has no time/notes row, dropping"
        );
    }

    Ok(sightings)
}

/// Converts "dd/mm/yy" into "d/m", e.g. "01/12/19" becomes "1/12".
pub fn short_date(raw: &str) -> Result<String, ParseError> {
    let trimmed = raw.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%d/%m/%y")
        .map_err(|_| ParseError::InvalidDate(trimmed.to_string()))?;
    Ok(format!("{}/{}", date.format("%-d"), date.format("%-m")))
}

fn parse_detail_row(row: usize, cells: &[String]) -> Result<DetailRow, ParseError> {
    Ok(DetailRow {
        row,
        date: short_date(&cells[0])?,
        species: cells[1].trim().to_string(),
        site: cells[2].clone(),
        count: cells[3].clone(),
        observer: cells[4].clone(),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector(format!("{}: {}", css, e)))
}
