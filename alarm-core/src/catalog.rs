use alarm_types::PhraseRecord;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::CatalogError;

const BUILTIN_PHRASES: &str = include_str!("../data/phrases.json");

/// The fixed, ordered set of phrases every round is dealt from.
#[derive(Debug, Clone)]
pub struct PhraseCatalog {
    phrases: Vec<PhraseRecord>,
}

impl PhraseCatalog {
    /// Build a catalog, rejecting empty lists and repeated phrase text.
    pub fn new(phrases: Vec<PhraseRecord>) -> Result<Self, CatalogError> {
        if phrases.is_empty() {
            return Err(CatalogError::Empty);
        }

        // Guesses match on phrase text
        let mut seen = HashSet::new();
        for record in &phrases {
            if !seen.insert(record.phrase.as_str()) {
                return Err(CatalogError::DuplicatePhrase {
                    phrase: record.phrase.clone(),
                });
            }
        }

        Ok(Self { phrases })
    }

    /// Parse a JSON array of `{"Phrase": .., "Type": ..}` records
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let phrases: Vec<PhraseRecord> = serde_json::from_str(json)?;
        Self::new(phrases)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} phrases from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_PHRASES)
    }

    pub fn phrases(&self) -> &[PhraseRecord] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|record| record.phrase == phrase)
    }
}
