//! Species → site → sightings aggregation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Sighting;

/// Sightings of one species at one site, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSightings {
    pub site: String,
    pub sightings: Vec<Sighting>,
}

/// Per-query index of sightings by species, then by site.
///
/// Sites keep first-encounter order and each site's list keeps arrival
/// order, so feeding days in date order gives chronological lists. Nothing
/// is deduplicated: submitting the same day twice doubles its sightings.
#[derive(Debug, Default, Clone)]
pub struct SpeciesIndex {
    species: HashMap<String, Vec<SiteSightings>>,
}

impl SpeciesIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sighting: Sighting) {
        let sites = self.species.entry(sighting.species.clone()).or_default();
        match sites.iter_mut().find(|s| s.site == sighting.site) {
            Some(site) => site.sightings.push(sighting),
            None => sites.push(SiteSightings {
                site: sighting.site.clone(),
                sightings: vec![sighting],
            }),
        }
    }

    /// Number of distinct species recorded.
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.species.contains_key(species)
    }

    pub fn sites(&self, species: &str) -> Option<&[SiteSightings]> {
        self.species.get(species).map(Vec::as_slice)
    }

    pub(crate) fn take(&mut self, species: &str) -> Option<Vec<SiteSightings>> {
        self.species.remove(species)
    }

    pub(crate) fn species_names(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }
}

impl Extend<Sighting> for SpeciesIndex {
    fn extend<I: IntoIterator<Item = Sighting>>(&mut self, iter: I) {
        for sighting in iter {
            self.add(sighting);
        }
    }
}

impl FromIterator<Sighting> for SpeciesIndex {
    fn from_iter<I: IntoIterator<Item = Sighting>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(date: &str, species: &str, site: &str) -> Sighting {
        Sighting {
            date: date.into(),
            time: String::new(),
            species: species.into(),
            site: site.into(),
            count: "1".into(),
            observer: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn robin_at_two_sites_on_two_days() {
        let mut index = SpeciesIndex::new();
        index.extend(vec![sighting("1/3", "Robin", "A")]);
        index.extend(vec![sighting("2/3", "Robin", "B")]);

        let sites = index.sites("Robin").unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].site, "A");
        assert_eq!(sites[0].sightings.len(), 1);
        assert_eq!(sites[0].sightings[0].date, "1/3");
        assert_eq!(sites[1].site, "B");
        assert_eq!(sites[1].sightings.len(), 1);
        assert_eq!(sites[1].sightings[0].date, "2/3");
    }

    #[test]
    fn same_site_appends_in_arrival_order() {
        let index: SpeciesIndex = vec![
            sighting("1/3", "Wren", "A"),
            sighting("2/3", "Wren", "A"),
            sighting("3/3", "Wren", "A"),
        ]
        .into_iter()
        .collect();
        let dates: Vec<&str> = index.sites("Wren").unwrap()[0]
            .sightings
            .iter()
            .map(|s| s.date.as_str())
            .collect();
        assert_eq!(dates, vec!["1/3", "2/3", "3/3"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let s = sighting("1/3", "Wren", "A");
        let index: SpeciesIndex = vec![s.clone(), s].into_iter().collect();
        assert_eq!(index.sites("Wren").unwrap()[0].sightings.len(), 2);
    }

    #[test]
    fn species_count_counts_distinct_species() {
        let index: SpeciesIndex = vec![
            sighting("1/3", "Wren", "A"),
            sighting("1/3", "Robin", "A"),
            sighting("1/3", "Wren", "B"),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.species_count(), 2);
        assert!(index.contains("Robin"));
        assert!(!index.contains("Blackbird"));
    }

    #[test]
    fn empty_index() {
        let index = SpeciesIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.species_count(), 0);
        assert!(index.sites("Robin").is_none());
    }
}
