//! Query parameters for a single day's sightings page.

use chrono::NaiveDate;
use url::Url;

/// County section used when none is given.
pub const DEFAULT_REGION: &str = "hants";

/// Parameters for the `birdnews.asp` results page of one calendar day.
///
/// The numeric codes are the site's own: `date_search=8` selects an exact
/// date, `sort=2` orders by species and `status_id=8` includes every record
/// status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayQuery {
    /// Day to list sightings for.
    pub date: NaiveDate,
    /// County section of the site (path segment before `birdnews.asp`).
    pub region: String,
    pub date_search: u8,
    pub sort: u8,
    pub status_id: u8,
}

impl DayQuery {
    /// Creates a query for `date` with the site's default codes.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            region: DEFAULT_REGION.to_string(),
            date_search: 8,
            sort: 2,
            status_id: 8,
        }
    }

    /// Selects a different county section.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Path of the results page relative to the site root.
    pub fn path(&self) -> String {
        format!("/{}/birdnews.asp", self.region)
    }

    /// Appends this query's parameters to the given URL, returning the modified URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("date_search", &self.date_search.to_string())
            .append_pair("date", &self.date.format("%Y-%m-%d").to_string())
            .append_pair("sort", &self.sort.to_string())
            .append_pair("status_id", &self.status_id.to_string());
        url
    }
}
