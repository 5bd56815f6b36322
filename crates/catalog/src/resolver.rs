use std::sync::Arc;

use invtrack_core::DomainResult;

use crate::entry::{CatalogEntry, CatalogRow, KnownItem};
use crate::store::CatalogStore;

/// Per-source cap applied before the typeahead merge in the batch store.
pub const ENTRY_SEARCH_LIMIT: usize = 10;

/// Deduplicating lookup over the curated catalog and the known-item registry.
#[derive(Clone)]
pub struct CatalogResolver {
    store: Arc<dyn CatalogStore>,
}

impl CatalogResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Import reference rows in bulk (e.g. from a spreadsheet upload).
    ///
    /// Rows missing either field are skipped. Names and HSN codes are
    /// trimmed; the first writer for a normalized name wins and later
    /// duplicates are silently dropped. Returns the number of rows actually
    /// inserted.
    pub fn bulk_import(&self, rows: Vec<CatalogRow>) -> DomainResult<usize> {
        let mut accepted = 0;
        for row in rows {
            let (Some(name), Some(hsn)) = (row.name, row.hsn_code) else {
                continue;
            };
            let name = name.trim().to_string();
            let hsn = hsn.trim().to_string();
            if name.is_empty() || hsn.is_empty() {
                continue;
            }
            let inserted = self.store.insert_entry_if_absent(CatalogEntry {
                name,
                hsn_code: hsn,
                item_id: None,
            })?;
            if inserted {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Register an item identity the ledger has just seen a batch for.
    ///
    /// Insert-if-absent keyed by `item_id`: a later batch of the same item
    /// never overwrites the registered record. Returns whether the record was
    /// newly inserted.
    pub fn sync_from_batch(&self, item: KnownItem) -> DomainResult<bool> {
        self.store.insert_known_item_if_absent(item)
    }

    /// Case-insensitive substring search over the curated entries, for the
    /// typeahead merge. Fragments are ANDed when both are given.
    pub fn entries_matching(
        &self,
        name_fragment: Option<&str>,
        hsn_fragment: Option<&str>,
    ) -> DomainResult<Vec<CatalogEntry>> {
        if name_fragment.is_none() && hsn_fragment.is_none() {
            return Ok(Vec::new());
        }

        let name_needle = name_fragment.map(str::to_lowercase);
        let hsn_needle = hsn_fragment.map(str::to_lowercase);

        let mut hits = Vec::new();
        for entry in self.store.entries()? {
            let name_ok = name_needle
                .as_deref()
                .is_none_or(|n| entry.name.to_lowercase().contains(n));
            let hsn_ok = hsn_needle
                .as_deref()
                .is_none_or(|h| entry.hsn_code.to_lowercase().contains(h));
            if name_ok && hsn_ok {
                hits.push(entry);
                if hits.len() == ENTRY_SEARCH_LIMIT {
                    break;
                }
            }
        }
        Ok(hits)
    }
}
