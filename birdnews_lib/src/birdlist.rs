//! Taxonomic species registry.
//!
//! The list is seeded from YAML (embedded at compile time, or read from a
//! file) and grows at runtime: species the parser has never seen are inserted at the
//! front. Insertions are not persisted.

use std::path::Path;
use std::sync::RwLock;

use serde::Deserialize;
use thiserror::Error;

/// Error types for bird list loading.
#[derive(Error, Debug)]
pub enum BirdListError {
    #[error("Failed to parse bird list YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Failed to read bird list file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Duplicate species in bird list: {0}")]
    DuplicateSpecies(String),
    #[error("Empty species name in bird list")]
    EmptySpecies,
}

/// Top-level structure for the bird list YAML file.
#[derive(Deserialize, Debug)]
pub struct BirdListFile {
    pub species: Vec<String>,
}

/// Ordered, shareable registry of species names in taxonomic order.
///
/// `add_if_absent` takes the write lock for the whole check-then-insert, so
/// concurrent parses of the same unknown species insert it exactly once.
#[derive(Debug, Default)]
pub struct BirdList {
    names: RwLock<Vec<String>>,
}

impl BirdList {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names: RwLock::new(names),
        }
    }

    /// Parses a bird list from YAML content.
    pub fn from_yaml(yaml_content: &str) -> Result<Self, BirdListError> {
        Ok(Self::new(parse_bird_list(yaml_content)?))
    }

    /// Loads the bird list embedded at compile time.
    pub fn load_default() -> Result<Self, BirdListError> {
        let yaml_content = include_str!("../../seed_data/birdlist.yml");
        Self::from_yaml(yaml_content)
    }

    /// Loads a bird list from a YAML file on disk.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, BirdListError> {
        let yaml_content = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml_content)
    }

    pub fn contains(&self, species: &str) -> bool {
        self.read().iter().any(|name| name == species)
    }

    /// Inserts `species` at the front of the list unless already present.
    /// Returns `true` when the species was added.
    pub fn add_if_absent(&self, species: &str) -> bool {
        let mut names = self.names.write().unwrap_or_else(|e| e.into_inner());
        if names.iter().any(|name| name == species) {
            return false;
        }
        tracing::info!("adding unknown bird {} to birdlist", species);
        names.insert(0, species.to_string());
        true
    }

    /// Position of `species` in taxonomic order.
    pub fn position(&self, species: &str) -> Option<usize> {
        self.read().iter().position(|name| name == species)
    }

    /// Copy of the current ordering.
    pub fn snapshot(&self) -> Vec<String> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<String>> {
        self.names.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse and validate species names from YAML content.
///
/// Names are trimmed; blank names and duplicates are rejected.
pub fn parse_bird_list(yaml_content: &str) -> Result<Vec<String>, BirdListError> {
    let file: BirdListFile = serde_yml::from_str(yaml_content)?;

    let mut names: Vec<String> = Vec::with_capacity(file.species.len());
    for raw in file.species {
        let name = raw.trim();
        if name.is_empty() {
            return Err(BirdListError::EmptySpecies);
        }
        if names.iter().any(|existing| existing == name) {
            return Err(BirdListError::DuplicateSpecies(name.to_string()));
        }
        names.push(name.to_string());
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_parse_valid_list() {
        let yaml = r#"
species:
  - "Wren"
  - "Robin"
  - "Blackbird"
"#;
        let names = parse_bird_list(yaml).unwrap();
        assert_eq!(names, vec!["Wren", "Robin", "Blackbird"]);
    }

    #[test]
    fn test_duplicate_species_rejected() {
        let yaml = r#"
species:
  - "Wren"
  - "Wren"
"#;
        let result = parse_bird_list(yaml);
        assert!(matches!(result, Err(BirdListError::DuplicateSpecies(ref s)) if s == "Wren"));
    }

    #[test]
    fn test_blank_species_rejected() {
        let yaml = r#"
species:
  - "  "
"#;
        assert!(matches!(
            parse_bird_list(yaml),
            Err(BirdListError::EmptySpecies)
        ));
    }

    #[test]
    fn test_names_are_trimmed() {
        let yaml = "species:\n  - \" Robin \"\n";
        assert_eq!(parse_bird_list(yaml).unwrap(), vec!["Robin"]);
    }

    #[test]
    fn test_load_default_succeeds() {
        let birds = BirdList::load_default().unwrap();
        assert!(birds.len() > 100);
        assert!(birds.contains("Robin"));
        assert!(birds.position("Mute Swan") < birds.position("Robin"));
    }

    #[test]
    fn add_if_absent_inserts_at_front() {
        let birds = BirdList::new(vec!["Wren".into(), "Robin".into()]);
        assert!(birds.add_if_absent("Hoopoe"));
        assert_eq!(birds.snapshot(), vec!["Hoopoe", "Wren", "Robin"]);
    }

    #[test]
    fn add_if_absent_is_idempotent() {
        let birds = BirdList::new(vec!["Wren".into()]);
        assert!(!birds.add_if_absent("Wren"));
        assert!(birds.add_if_absent("Hoopoe"));
        assert!(!birds.add_if_absent("Hoopoe"));
        assert_eq!(birds.len(), 2);
    }

    #[test]
    fn concurrent_inserts_do_not_duplicate() {
        let birds = Arc::new(BirdList::new(vec!["Wren".into()]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let birds = Arc::clone(&birds);
                std::thread::spawn(move || birds.add_if_absent("Hoopoe"))
            })
            .collect();
        let inserted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(birds.snapshot(), vec!["Hoopoe", "Wren"]);
    }
}
