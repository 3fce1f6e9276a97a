//! Projects a [`SpeciesIndex`] onto the bird list's taxonomic order.

use serde::{Deserialize, Serialize};

use crate::aggregate::{SiteSightings, SpeciesIndex};
use crate::birdlist::BirdList;

/// One species in display order with its sightings grouped by site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub species: String,
    pub sites: Vec<SiteSightings>,
}

/// Orders the recorded species by their position in `birds`.
///
/// Species on the list but not recorded are left out. Recorded species
/// missing from the list should not exist, because the parser registers
/// every species it reads; any that do are dropped with a warning.
pub fn taxonomic_order(mut index: SpeciesIndex, birds: &BirdList) -> Vec<SpeciesEntry> {
    let mut ordered = Vec::with_capacity(index.species_count());
    for species in birds.snapshot() {
        if let Some(sites) = index.take(&species) {
            ordered.push(SpeciesEntry { species, sites });
        }
    }

    for species in index.species_names() {
        tracing::warn!(species, "species missing from birdlist, not shown");
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sighting;

    fn sighting(species: &str) -> Sighting {
        Sighting {
            date: "1/3".into(),
            time: String::new(),
            species: species.into(),
            site: "A".into(),
            count: "1".into(),
            observer: String::new(),
            notes: String::new(),
        }
    }

    fn names(entries: &[SpeciesEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.species.as_str()).collect()
    }

    #[test]
    fn follows_birdlist_and_skips_unrecorded() {
        let birds = BirdList::new(vec!["Wren".into(), "Robin".into(), "Blackbird".into()]);
        let index: SpeciesIndex = vec![sighting("Blackbird"), sighting("Wren")]
            .into_iter()
            .collect();
        let ordered = taxonomic_order(index, &birds);
        assert_eq!(names(&ordered), vec!["Wren", "Blackbird"]);
    }

    #[test]
    fn inserted_species_sorts_at_insert_position() {
        let birds = BirdList::new(vec!["Wren".into(), "Robin".into()]);
        birds.add_if_absent("Hoopoe");
        let index: SpeciesIndex = vec![sighting("Robin"), sighting("Hoopoe")]
            .into_iter()
            .collect();
        let ordered = taxonomic_order(index, &birds);
        assert_eq!(names(&ordered), vec!["Hoopoe", "Robin"]);
    }

    #[test]
    fn unlisted_species_are_dropped() {
        let birds = BirdList::new(vec!["Wren".into()]);
        let index: SpeciesIndex = vec![sighting("Wren"), sighting("Dodo")]
            .into_iter()
            .collect();
        let ordered = taxonomic_order(index, &birds);
        assert_eq!(names(&ordered), vec!["Wren"]);
    }

    #[test]
    fn empty_index_gives_empty_order() {
        let birds = BirdList::new(vec!["Wren".into()]);
        assert!(taxonomic_order(SpeciesIndex::new(), &birds).is_empty());
    }

    #[test]
    fn sites_travel_with_species() {
        let birds = BirdList::new(vec!["Wren".into()]);
        let index: SpeciesIndex = vec![sighting("Wren"), sighting("Wren")].into_iter().collect();
        let ordered = taxonomic_order(index, &birds);
        assert_eq!(ordered[0].sites.len(), 1);
        assert_eq!(ordered[0].sites[0].sightings.len(), 2);
    }
}
