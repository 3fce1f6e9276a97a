//! Core record types.

use serde::{Deserialize, Serialize};

/// One recorded bird observation, built from a pair of table rows.
///
/// `date` is the short "D/M" form (e.g. "1/12" for 1st December); every
/// other field is the cell text as published.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sighting {
    pub date: String,
    pub time: String,
    pub species: String,
    pub site: String,
    pub count: String,
    pub observer: String,
    pub notes: String,
}
