//! Error types for the library layer.

use std::fmt;

use crate::cache::CacheError;
use crate::parse::ParseError;

/// Errors produced by the library layer, wrapping upstream fetch errors
/// and adding cache, parse, and input validation failures.
#[derive(Debug)]
pub enum BirdNewsError {
    /// A day page could not be fetched (network error, timeout, or non-success status).
    Fetch(birdnews_api::Error),
    /// A day page could not be parsed at all.
    Parse(ParseError),
    /// The cache backend failed. Queries do not fall back to uncached mode.
    Cache(CacheError),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl BirdNewsError {
    /// True for failures confined to one day, which a range query skips.
    pub fn is_day_local(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Parse(_))
    }
}

impl fmt::Display for BirdNewsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Fetch error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Cache(e) => write!(f, "Cache error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for BirdNewsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Cache(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<birdnews_api::Error> for BirdNewsError {
    fn from(e: birdnews_api::Error) -> Self {
        Self::Fetch(e)
    }
}

impl From<ParseError> for BirdNewsError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<CacheError> for BirdNewsError {
    fn from(e: CacheError) -> Self {
        Self::Cache(e)
    }
}
