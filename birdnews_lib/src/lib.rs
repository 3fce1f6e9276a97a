//! Library layer for birdnews: parsing, caching, and aggregation of
//! Going Birding sightings.
//!
//! Wraps the `birdnews_api` page client with a day cache (in-memory or
//! SQLite), the table row parser, the taxonomic bird list, and the range
//! query that turns a span of days into species grouped by site.

pub mod aggregate;
pub mod birdlist;
pub mod cache;
pub mod client;
pub mod db;
pub mod error;
pub mod parse;
pub mod search;
pub mod taxonomy;
pub mod types;
pub mod validation;

pub use birdnews_api;

pub use aggregate::{SiteSightings, SpeciesIndex};
pub use birdlist::{BirdList, BirdListError};
pub use cache::{CacheError, CacheStore, DayCache, MemoryCache, DEFAULT_CACHE_TTL};
pub use client::{CachedClient, RetryConfig};
pub use db::Db;
pub use error::BirdNewsError;
pub use parse::{parse_day_page, ParseError};
pub use search::{search, search_with_progress, DayOutcome, SearchReport};
pub use taxonomy::{taxonomic_order, SpeciesEntry};
pub use types::Sighting;
