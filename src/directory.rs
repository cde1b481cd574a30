//! Client directory.
//!
//! Two tables back client resolution:
//!
//! - the **abbreviation table**: lowercase abbreviation -> `ClientIdentity`
//!   (id + the name written on the abbreviation sheet), kept in insertion
//!   order because fuzzy ties go to the first key encountered;
//! - the **client records**: full rows (zone, accounting mode, default
//!   format) keyed by client id.
//!
//! Resolution is exact lookup first, then a Levenshtein scan over every key
//! that accepts the global minimum when it is within the configured distance.
//! The hit is then joined with its full record; when no record exists the
//! abbreviation-only client is returned instead of failing.
//!
//! ```text
//! "Aziiz" ──exact──x
//!         └─fuzzy── "aziz" (d=1) ── C00013 ──join── Client { zone, default_format, .. }
//! ```

use crate::FamilyTable;
use crate::families::FamilyEntry;
use crate::text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identity carried by an abbreviation hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub id: String,
    pub name: String,
}

/// A resolved client, as attached to emitted orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    /// Official name from the client records (abbreviation-sheet name when
    /// no record exists).
    pub name: String,
    pub zone: Option<String>,
    pub accounting_mode: Option<String>,
    /// Default-format code such as `"1"`, `"25"` or `"5"`.
    pub default_format: String,
    /// Name as written on the abbreviation sheet.
    pub abbreviation_name: String,
}

impl Client {
    /// Format an order for this client opens with.
    pub fn opening_format(&self) -> crate::Format {
        crate::Format::from_default_code(&self.default_format)
    }
}

/// One row of the `clients` sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(rename = "ID_Client")]
    pub id: String,
    #[serde(rename = "Nom_Client", default)]
    pub name: String,
    #[serde(rename = "Zone", default)]
    pub zone: Option<String>,
    #[serde(rename = "Mode_Comptable", default)]
    pub accounting_mode: Option<String>,
    #[serde(rename = "DEFAULT", default)]
    pub default_format: Option<String>,
}

/// One row of the `abrev.clients` sheet: a client and up to six abbreviations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationRow {
    #[serde(rename = "ID_Client", default)]
    pub id: String,
    #[serde(rename = "Nom_Client", default)]
    pub name: String,
    #[serde(rename = "AB1", default)]
    pub ab1: Option<String>,
    #[serde(rename = "AB2", default)]
    pub ab2: Option<String>,
    #[serde(rename = "AB3", default)]
    pub ab3: Option<String>,
    #[serde(rename = "AB4", default)]
    pub ab4: Option<String>,
    #[serde(rename = "AB5", default)]
    pub ab5: Option<String>,
    #[serde(rename = "AB6", default)]
    pub ab6: Option<String>,
}

impl AbbreviationRow {
    /// Non-blank abbreviations, AB1 first.
    pub fn abbreviations(&self) -> impl Iterator<Item = &str> {
        [&self.ab1, &self.ab2, &self.ab3, &self.ab4, &self.ab5, &self.ab6]
            .into_iter()
            .filter_map(|ab| ab.as_deref())
            .filter(|ab| !ab.trim().is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read directory file {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid directory file {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("directory file {} defines no client abbreviations", .path.display())]
    NoAbbreviations { path: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    /// Abbreviation keys in insertion order.
    keys: Vec<(String, ClientIdentity)>,
    /// Key -> position in `keys`.
    index: HashMap<String, usize>,
    /// Full client records by id.
    records: HashMap<String, ClientRecord>,
}

impl ClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from sheet rows, abbreviations in row order then AB1..AB6.
    pub fn from_rows(records: Vec<ClientRecord>, abbreviations: &[AbbreviationRow]) -> Self {
        let mut directory = Self::new();
        for record in records {
            directory.insert_record(record);
        }
        for row in abbreviations {
            let identity = ClientIdentity { id: row.id.clone(), name: row.name.clone() };
            for ab in row.abbreviations() {
                directory.insert_abbreviation(ab, identity.clone());
            }
        }
        directory
    }

    /// Register an abbreviation. An existing key keeps its position and gets
    /// the new identity.
    pub fn insert_abbreviation(&mut self, abbreviation: &str, identity: ClientIdentity) {
        let key = text::client_key(abbreviation);
        if key.is_empty() {
            return;
        }
        match self.index.get(&key) {
            Some(&pos) => self.keys[pos].1 = identity,
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push((key, identity));
            }
        }
    }

    pub fn insert_record(&mut self, record: ClientRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Exact abbreviation lookup (trimmed, lowercased).
    pub fn find(&self, abbreviation: &str) -> Option<&ClientIdentity> {
        let key = text::client_key(abbreviation);
        self.index.get(&key).map(|&pos| &self.keys[pos].1)
    }

    /// Closest abbreviation key by edit distance, accepted when the minimum
    /// distance is at most `max_distance`. Returns the key, its identity and
    /// the distance. Equal distances keep the earliest key.
    pub fn fuzzy_find(&self, abbreviation: &str, max_distance: usize) -> Option<(&str, &ClientIdentity, usize)> {
        let input = text::client_key(abbreviation);
        let mut best: Option<(usize, usize)> = None;

        for (pos, (key, _)) in self.keys.iter().enumerate() {
            let distance = strsim::levenshtein(&input, key);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((pos, distance));
            }
        }

        let (pos, distance) = best?;
        if distance > max_distance {
            tracing::trace!(input = %input, closest = %self.keys[pos].0, distance, "fuzzy client lookup rejected");
            return None;
        }

        let (key, identity) = &self.keys[pos];
        tracing::debug!(input = %input, key = %key, distance, "fuzzy client match");
        Some((key.as_str(), identity, distance))
    }

    /// Exact, then fuzzy.
    pub fn resolve_identity(&self, abbreviation: &str, max_distance: usize) -> Option<&ClientIdentity> {
        self.find(abbreviation).or_else(|| self.fuzzy_find(abbreviation, max_distance).map(|(_, identity, _)| identity))
    }

    /// Resolve an abbreviation to a full client, falling back to the
    /// abbreviation-only client when the id has no record.
    pub fn resolve(&self, abbreviation: &str, max_distance: usize) -> Option<Client> {
        let identity = self.resolve_identity(abbreviation, max_distance)?;

        let Some(record) = self.records.get(&identity.id) else {
            tracing::debug!(id = %identity.id, "no client record for abbreviation hit, using partial client");
            return Some(Client {
                id: identity.id.clone(),
                name: identity.name.clone(),
                zone: None,
                accounting_mode: None,
                default_format: "1".to_string(),
                abbreviation_name: identity.name.clone(),
            });
        };

        Some(Client {
            id: record.id.clone(),
            name: record.name.clone(),
            zone: record.zone.clone(),
            accounting_mode: record.accounting_mode.clone(),
            default_format: record.default_format.clone().filter(|d| !d.trim().is_empty()).unwrap_or_else(|| "1".into()),
            abbreviation_name: identity.name.clone(),
        })
    }
}

// --- Loading ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    clients: Vec<ClientRecord>,
    #[serde(default)]
    abbreviations: Vec<AbbreviationRow>,
    #[serde(default)]
    families: Option<HashMap<String, FamilyEntry>>,
}

/// Everything the engine looks things up in, loaded once before parsing.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub clients: ClientDirectory,
    pub families: FamilyTable,
}

impl Tables {
    pub fn new(clients: ClientDirectory, families: FamilyTable) -> Self {
        Tables { clients, families }
    }

    /// Load a JSON directory file (`clients`, `abbreviations`, optional
    /// `families`). Without `families` the built-in family table is used.
    pub fn load(path: impl AsRef<Path>) -> Result<Tables, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| DirectoryError::Io { path: path.to_path_buf(), source })?;
        let tables = Self::from_json_str(&raw).map_err(|source| DirectoryError::Json { path: path.to_path_buf(), source })?;

        if tables.clients.is_empty() {
            return Err(DirectoryError::NoAbbreviations { path: path.to_path_buf() });
        }

        tracing::info!(
            path = %path.display(),
            abbreviations = tables.clients.len(),
            families = tables.families.len(),
            "loaded directory"
        );
        Ok(tables)
    }

    pub fn from_json_str(raw: &str) -> Result<Tables, serde_json::Error> {
        let file: DirectoryFile = serde_json::from_str(raw)?;
        let clients = ClientDirectory::from_rows(file.clients, &file.abbreviations);
        let families = match file.families {
            Some(entries) => FamilyTable::from_entries(entries),
            None => FamilyTable::default(),
        };
        Ok(Tables { clients, families })
    }
}
