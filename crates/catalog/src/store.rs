use std::sync::Arc;

use invtrack_core::{DomainResult, ItemId};

use crate::entry::{CatalogEntry, KnownItem};

/// Persistence port for the catalog collections.
///
/// The backing store is expected to provide an upsert-on-conflict primitive
/// (insert-if-absent keyed by a unique field); both insert methods return
/// `false` when the key was already taken.
pub trait CatalogStore: Send + Sync {
    /// Insert a reference entry unless one already exists for the same
    /// normalized name. Returns whether the entry was inserted.
    fn insert_entry_if_absent(&self, entry: CatalogEntry) -> DomainResult<bool>;

    /// Insert a known-item record unless the item identity is already
    /// registered. Returns whether the record was inserted.
    fn insert_known_item_if_absent(&self, item: KnownItem) -> DomainResult<bool>;

    fn entries(&self) -> DomainResult<Vec<CatalogEntry>>;

    fn known_item(&self, item_id: ItemId) -> DomainResult<Option<KnownItem>>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn insert_entry_if_absent(&self, entry: CatalogEntry) -> DomainResult<bool> {
        (**self).insert_entry_if_absent(entry)
    }

    fn insert_known_item_if_absent(&self, item: KnownItem) -> DomainResult<bool> {
        (**self).insert_known_item_if_absent(item)
    }

    fn entries(&self) -> DomainResult<Vec<CatalogEntry>> {
        (**self).entries()
    }

    fn known_item(&self, item_id: ItemId) -> DomainResult<Option<KnownItem>> {
        (**self).known_item(item_id)
    }
}
