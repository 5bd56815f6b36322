use serde::{Deserialize, Serialize};

use invtrack_core::ItemId;

/// Normalized form of an item name: trimmed and case-folded.
///
/// Both catalog deduplication and typeahead merging key on this form.
pub fn normalized_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Curated name/HSN reference record used for input assist.
///
/// Decoupled from purchase history; first writer for a normalized name wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub hsn_code: String,
    /// Link to a known item identity, when one exists.
    pub item_id: Option<ItemId>,
}

impl CatalogEntry {
    pub fn normalized_name(&self) -> String {
        normalized_name(&self.name)
    }
}

/// One row of a bulk import (e.g. a spreadsheet line). Rows missing either
/// field are skipped, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub name: Option<String>,
    pub hsn_code: Option<String>,
}

/// Catalog-adjacent registry record: an item identity the system has seen a
/// batch for, so future purchases can look it up by identity rather than
/// re-keying by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownItem {
    pub item_id: ItemId,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub hsn_code: Option<String>,
}
