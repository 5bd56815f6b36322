use std::sync::Arc;

use invtrack_core::{BatchId, DomainResult, ItemId};

use crate::batch::Batch;

/// Persistence port for batch records.
///
/// Implementations must preserve insertion order in `by_item`/`all`; the
/// store layers its newest-first ordering on top of that.
pub trait BatchRepository: Send + Sync {
    fn insert(&self, batch: Batch) -> DomainResult<()>;

    fn fetch(&self, id: BatchId) -> DomainResult<Option<Batch>>;

    /// Replace an existing record. `NotFound` when the id is unknown.
    fn save(&self, batch: &Batch) -> DomainResult<()>;

    /// All batches for one item, in insertion order.
    fn by_item(&self, item_id: ItemId) -> DomainResult<Vec<Batch>>;

    /// All batches tagged with an invoice number, in insertion order.
    fn by_invoice_number(&self, invoice_number: &str) -> DomainResult<Vec<Batch>>;

    /// Every batch, in insertion order.
    fn all(&self) -> DomainResult<Vec<Batch>>;
}

impl<R> BatchRepository for Arc<R>
where
    R: BatchRepository + ?Sized,
{
    fn insert(&self, batch: Batch) -> DomainResult<()> {
        (**self).insert(batch)
    }

    fn fetch(&self, id: BatchId) -> DomainResult<Option<Batch>> {
        (**self).fetch(id)
    }

    fn save(&self, batch: &Batch) -> DomainResult<()> {
        (**self).save(batch)
    }

    fn by_item(&self, item_id: ItemId) -> DomainResult<Vec<Batch>> {
        (**self).by_item(item_id)
    }

    fn by_invoice_number(&self, invoice_number: &str) -> DomainResult<Vec<Batch>> {
        (**self).by_invoice_number(invoice_number)
    }

    fn all(&self) -> DomainResult<Vec<Batch>> {
        (**self).all()
    }
}
