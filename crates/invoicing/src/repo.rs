use std::sync::Arc;

use invtrack_core::{BatchId, DomainResult, InvoiceId};

use crate::invoice::Invoice;

/// Persistence port for invoices.
pub trait InvoiceRepository: Send + Sync {
    fn insert(&self, invoice: Invoice) -> DomainResult<()>;

    fn fetch(&self, id: InvoiceId) -> DomainResult<Option<Invoice>>;

    /// Replace an existing record. `NotFound` when the id is unknown.
    fn save(&self, invoice: &Invoice) -> DomainResult<()>;

    /// Every invoice whose membership intersects the given batch ids.
    fn referencing_any(&self, batch_ids: &[BatchId]) -> DomainResult<Vec<Invoice>>;

    fn all(&self) -> DomainResult<Vec<Invoice>>;
}

impl<R> InvoiceRepository for Arc<R>
where
    R: InvoiceRepository + ?Sized,
{
    fn insert(&self, invoice: Invoice) -> DomainResult<()> {
        (**self).insert(invoice)
    }

    fn fetch(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        (**self).fetch(id)
    }

    fn save(&self, invoice: &Invoice) -> DomainResult<()> {
        (**self).save(invoice)
    }

    fn referencing_any(&self, batch_ids: &[BatchId]) -> DomainResult<Vec<Invoice>> {
        (**self).referencing_any(batch_ids)
    }

    fn all(&self) -> DomainResult<Vec<Invoice>> {
        (**self).all()
    }
}
