use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::DirectoryError;
use crate::text;

pub(crate) const CITRON: &str = "C";
pub(crate) const MOJITO: &str = "M";
pub(crate) const FRAISE: &str = "F";
pub(crate) const RED: &str = "R";
/// Family used for a fifth quantity whose trailing word does not resolve.
pub(crate) const COOL: &str = "CL";

/// Column order of a numeric block in every format but 5L.
pub(crate) const BLOCK_FAMILIES: [&str; 4] = [CITRON, MOJITO, FRAISE, RED];
/// Column order of a two-quantity block in 5L.
pub(crate) const FIVE_LITRE_FAMILIES: [&str; 2] = [FRAISE, CITRON];

/// Built-in abbreviation -> (family code, label) table.
static BUILTIN_FAMILIES: Lazy<Vec<(&'static str, &'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("mj", MOJITO, "Mojito"),
        ("m", MOJITO, "Mojito"),
        ("f", FRAISE, "Fraise"),
        ("fr", FRAISE, "Fraise"),
        ("red", RED, "Red Citrus"),
        ("c", CITRON, "Citron"),
        ("cl", COOL, "Cool"),
        ("mg", "MG", "Mangue"),
        ("as", "AS", "Ananas"),
        ("kw", "KW", "Kiwi"),
        ("y", "Y", "Youppi"),
        ("ss", "SS", "Sunshine"),
        ("pl", "PL", "Peach Love"),
        ("gw", "GW", "Green Wave"),
    ]
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEntry {
    #[serde(rename = "familyCode")]
    pub family_code: String,
    pub label: String,
}

/// Juice family abbreviations. Lookups are exact after folding (no fuzzy
/// matching on product abbreviations).
#[derive(Debug, Clone)]
pub struct FamilyTable {
    entries: HashMap<String, FamilyEntry>,
}

impl Default for FamilyTable {
    fn default() -> Self {
        let mut table = FamilyTable::empty();
        for (abbrev, code, label) in BUILTIN_FAMILIES.iter() {
            table.insert(abbrev, FamilyEntry { family_code: code.to_string(), label: label.to_string() });
        }
        table
    }
}

impl FamilyTable {
    pub fn empty() -> Self {
        FamilyTable { entries: HashMap::new() }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, FamilyEntry)>) -> Self {
        let mut table = FamilyTable::empty();
        for (abbrev, entry) in entries {
            table.insert(&abbrev, entry);
        }
        table
    }

    /// Load a JSON map `abbreviation -> { familyCode, label }`.
    pub fn load(path: impl AsRef<Path>) -> Result<FamilyTable, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| DirectoryError::Io { path: path.to_path_buf(), source })?;
        let entries: HashMap<String, FamilyEntry> =
            serde_json::from_str(&raw).map_err(|source| DirectoryError::Json { path: path.to_path_buf(), source })?;

        tracing::info!(path = %path.display(), families = entries.len(), "loaded family table");
        Ok(FamilyTable::from_entries(entries))
    }

    pub fn insert(&mut self, abbreviation: &str, entry: FamilyEntry) {
        self.entries.insert(text::fold(abbreviation), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, abbreviation: &str) -> Option<&FamilyEntry> {
        self.entries.get(&text::fold(abbreviation))
    }

    pub fn family_code(&self, abbreviation: &str) -> Option<&str> {
        self.lookup(abbreviation).map(|e| e.family_code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_resolves_known_abbreviations() {
        let table = FamilyTable::default();
        assert_eq!(table.len(), 14);
        assert_eq!(table.family_code("MJ"), Some("M"));
        assert_eq!(table.family_code(" red "), Some("R"));
        assert_eq!(table.family_code("cl"), Some("CL"));
        assert_eq!(table.lookup("pl").map(|e| e.label.as_str()), Some("Peach Love"));
    }

    #[test]
    fn lookup_is_exact_after_folding() {
        let mut table = FamilyTable::empty();
        table.insert("Fraisé", FamilyEntry { family_code: "F".into(), label: "Fraise".into() });

        assert_eq!(table.family_code("fraise"), Some("F"));
        assert_eq!(table.family_code("FRAISÉ"), Some("F"));
        assert_eq!(table.family_code("frais"), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FamilyTable::load("/nonexistent/families.json").unwrap_err();
        assert!(matches!(err, DirectoryError::Io { .. }));
    }
}
