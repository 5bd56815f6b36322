use std::sync::Arc;

use chrono::Utc;

use invtrack_batches::{Batch, BatchRepository};
use invtrack_core::{DomainError, DomainResult, InvoiceId, ItemId, SupplierId};
use invtrack_parties::SupplierDirectory;

use crate::invoice::{Invoice, NewInvoice};
use crate::repo::InvoiceRepository;

/// Keeps invoices consistent with their member batches.
#[derive(Clone)]
pub struct InvoiceReconciler {
    invoices: Arc<dyn InvoiceRepository>,
    batches: Arc<dyn BatchRepository>,
    suppliers: Arc<dyn SupplierDirectory>,
}

impl InvoiceReconciler {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        batches: Arc<dyn BatchRepository>,
        suppliers: Arc<dyn SupplierDirectory>,
    ) -> Self {
        Self {
            invoices,
            batches,
            suppliers,
        }
    }

    /// Create an invoice over freshly created member batches.
    pub fn create(&self, input: NewInvoice, members: &[Batch]) -> DomainResult<Invoice> {
        let invoice = Invoice::try_new(input, members, Utc::now())?;
        self.invoices.insert(invoice.clone())?;
        Ok(invoice)
    }

    pub fn invoice(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        self.invoices.fetch(id)
    }

    /// Recompute totals for every invoice touching an item's batches.
    ///
    /// Called after any batch edit: each affected invoice re-fetches its
    /// current member batches and re-derives its totals from their fresh
    /// `taxed_total`s. Members that no longer resolve are simply absent from
    /// the sum. Returns the invoices that were recomputed and persisted.
    pub fn recalculate_for_item(&self, item_id: ItemId) -> DomainResult<Vec<Invoice>> {
        let batch_ids: Vec<_> = self
            .batches
            .by_item(item_id)?
            .into_iter()
            .map(|batch| batch.id)
            .collect();
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated = Vec::new();
        for mut invoice in self.invoices.referencing_any(&batch_ids)? {
            let mut members = Vec::with_capacity(invoice.batch_ids.len());
            for id in &invoice.batch_ids {
                if let Some(batch) = self.batches.fetch(*id)? {
                    members.push(batch);
                }
            }
            invoice.recompute_totals(&members);
            self.invoices.save(&invoice)?;
            updated.push(invoice);
        }
        Ok(updated)
    }

    /// Change an invoice's identity (number + supplier) and cascade it onto
    /// the batches tagged with the old invoice number.
    ///
    /// Identity only: batch and invoice amounts are untouched.
    pub fn change_identity(
        &self,
        invoice_id: InvoiceId,
        new_invoice_number: &str,
        new_supplier_id: SupplierId,
    ) -> DomainResult<Invoice> {
        if new_invoice_number.trim().is_empty() {
            return Err(DomainError::validation("invoice number is required"));
        }

        let mut invoice = self
            .invoices
            .fetch(invoice_id)?
            .ok_or(DomainError::NotFound)?;
        let supplier = self.suppliers.resolve(new_supplier_id)?;
        let old_number = invoice.invoice_number.clone();
        let new_number = new_invoice_number.trim();

        invoice.invoice_number = new_number.to_string();
        invoice.supplier_id = new_supplier_id;
        self.invoices.save(&invoice)?;

        for mut batch in self.batches.by_invoice_number(&old_number)? {
            batch.restamp_identity(new_number, &supplier);
            self.batches.save(&batch)?;
        }

        Ok(invoice)
    }
}
