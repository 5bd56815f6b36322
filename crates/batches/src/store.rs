use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use invtrack_catalog::{normalized_name, CatalogResolver};
use invtrack_core::{BatchId, DomainError, DomainResult, InvoiceId, ItemId};

use crate::batch::{Batch, BatchPatch, NewBatch};
use crate::repo::BatchRepository;

/// Cap on merged typeahead results.
pub const SEARCH_RESULT_LIMIT: usize = 15;

/// Per-source cap applied to batch-history matches before the merge.
const HISTORY_SEARCH_LIMIT: usize = 10;

/// Where a typeahead suggestion came from. History matches outrank
/// catalog-only matches for the same normalized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    History,
    Catalog,
}

/// One typeahead suggestion for the purchase entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSuggestion {
    pub item_id: Option<ItemId>,
    pub name: String,
    pub hsn_code: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub source: SuggestionSource,
}

/// Service over the batch collection: creation with derived pricing, edits
/// with recomputation, newest-first item views, and the merged typeahead.
#[derive(Clone)]
pub struct BatchStore {
    repo: Arc<dyn BatchRepository>,
    catalog: CatalogResolver,
}

impl BatchStore {
    pub fn new(repo: Arc<dyn BatchRepository>, catalog: CatalogResolver) -> Self {
        Self { repo, catalog }
    }

    /// Validate, derive and persist a new batch. No side effects beyond
    /// persistence; catalog registration is an explicit step of the
    /// purchase-finalization flow.
    pub fn create(&self, input: NewBatch) -> DomainResult<Batch> {
        let batch = Batch::try_new(input, Utc::now())?;
        self.repo.insert(batch.clone())?;
        Ok(batch)
    }

    /// Apply an edit and persist the recomputed record.
    ///
    /// Callers exposing this operation must follow a successful update with
    /// invoice reconciliation for the batch's item; the engine facade does.
    pub fn update(&self, id: BatchId, patch: BatchPatch) -> DomainResult<Batch> {
        let existing = self.repo.fetch(id)?.ok_or(DomainError::NotFound)?;
        let updated = existing.apply_patch(patch)?;
        self.repo.save(&updated)?;
        Ok(updated)
    }

    pub fn get(&self, id: BatchId) -> DomainResult<Option<Batch>> {
        self.repo.fetch(id)
    }

    /// Back-fill the owning invoice onto a batch after the invoice is
    /// finalized.
    pub fn link_invoice(&self, id: BatchId, invoice_id: InvoiceId) -> DomainResult<Batch> {
        let mut batch = self.repo.fetch(id)?.ok_or(DomainError::NotFound)?;
        batch.invoice_id = Some(invoice_id);
        self.repo.save(&batch)?;
        Ok(batch)
    }

    pub fn all(&self) -> DomainResult<Vec<Batch>> {
        self.repo.all()
    }

    /// Batches for one item, most-recent purchase first.
    ///
    /// Ties on `purchase_date` break newest-insertion-first: the repository
    /// yields insertion order, so reversing before a stable sort keeps the
    /// most recently recorded batch ahead of equal-dated older ones.
    pub fn find_by_item(&self, item_id: ItemId) -> DomainResult<Vec<Batch>> {
        let mut batches = self.repo.by_item(item_id)?;
        batches.reverse();
        batches.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(batches)
    }

    /// The newest batch of an item (form prefill; authoritative reorder
    /// threshold).
    pub fn latest_for_item(&self, item_id: ItemId) -> DomainResult<Option<Batch>> {
        Ok(self.find_by_item(item_id)?.into_iter().next())
    }

    /// Merged typeahead over batch history and the curated catalog.
    ///
    /// Case-insensitive substring match on name and HSN (ANDed when both
    /// fragments are given); results de-duplicated by normalized name with
    /// history taking precedence, capped at [`SEARCH_RESULT_LIMIT`]. Input
    /// assist only — never a stock-accuracy operation.
    pub fn search(
        &self,
        name_fragment: Option<&str>,
        hsn_fragment: Option<&str>,
    ) -> DomainResult<Vec<ItemSuggestion>> {
        if name_fragment.is_none() && hsn_fragment.is_none() {
            return Ok(Vec::new());
        }

        let name_needle = name_fragment.map(str::to_lowercase);
        let hsn_needle = hsn_fragment.map(str::to_lowercase);

        let mut history = Vec::new();
        for batch in self.repo.all()? {
            let name_ok = name_needle
                .as_deref()
                .is_none_or(|n| batch.name.to_lowercase().contains(n));
            let hsn_ok = hsn_needle.as_deref().is_none_or(|h| {
                batch
                    .hsn_code
                    .as_deref()
                    .is_some_and(|code| code.to_lowercase().contains(h))
            });
            if name_ok && hsn_ok {
                history.push(ItemSuggestion {
                    item_id: Some(batch.item_id),
                    name: batch.name,
                    hsn_code: batch.hsn_code,
                    unit: Some(batch.unit),
                    category: batch.category,
                    source: SuggestionSource::History,
                });
                if history.len() == HISTORY_SEARCH_LIMIT {
                    break;
                }
            }
        }

        let catalog = self
            .catalog
            .entries_matching(name_fragment, hsn_fragment)?
            .into_iter()
            .map(|entry| ItemSuggestion {
                item_id: entry.item_id,
                name: entry.name,
                hsn_code: Some(entry.hsn_code),
                unit: None,
                category: None,
                source: SuggestionSource::Catalog,
            });

        let mut seen = std::collections::HashSet::new();
        let mut merged = Vec::new();
        for suggestion in history.into_iter().chain(catalog) {
            if seen.insert(normalized_name(&suggestion.name)) {
                merged.push(suggestion);
                if merged.len() == SEARCH_RESULT_LIMIT {
                    break;
                }
            }
        }
        Ok(merged)
    }
}
