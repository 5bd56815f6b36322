use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use invtrack_alerts::{AlertLog, AlertOutcome, AlertSender, LowStockAlerter};
use invtrack_allocation::{ItemAllocation, StockAllocator, StockHealthReport, StockRegisterRow};
use invtrack_batches::{
    Batch, BatchPatch, BatchRepository, BatchStore, ItemSuggestion, NewBatch,
};
use invtrack_catalog::{CatalogResolver, CatalogRow, CatalogStore, KnownItem};
use invtrack_core::{BatchId, DomainError, DomainResult, InvoiceId, ItemId, SupplierId};
use invtrack_distribution::{
    Distribution, DistributionLedger, DistributionRepository, NewDistribution,
};
use invtrack_invoicing::{Invoice, InvoiceReconciler, InvoiceRepository, NewInvoice};
use invtrack_parties::SupplierDirectory;

/// One purchase-entry submission: a numbered supplier visit and the batch
/// lines bought during it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDraft {
    pub invoice_number: String,
    pub supplier_id: SupplierId,
    pub cgst_percent: Decimal,
    pub sgst_percent: Decimal,
    /// Applied to lines that carry no date of their own.
    pub purchase_date: Option<DateTime<Utc>>,
    pub lines: Vec<NewBatch>,
}

/// Result of finalizing a purchase: the invoice plus its member batches,
/// each back-linked to the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub invoice: Invoice,
    pub batches: Vec<Batch>,
}

/// Facade over the whole ledger: batch store, distribution ledger, stock
/// allocator, invoice reconciler, catalog and alerting, wired over one set
/// of storage ports.
///
/// This is the only layer that sequences cross-service effects, most
/// importantly re-reconciling invoices after a batch edit.
#[derive(Clone)]
pub struct StockLedgerEngine {
    batches: BatchStore,
    ledger: DistributionLedger,
    allocator: StockAllocator,
    reconciler: InvoiceReconciler,
    catalog: CatalogResolver,
    suppliers: Arc<dyn SupplierDirectory>,
    alerter: Arc<LowStockAlerter>,
}

impl StockLedgerEngine {
    pub fn new(
        batch_repo: Arc<dyn BatchRepository>,
        distribution_repo: Arc<dyn DistributionRepository>,
        invoice_repo: Arc<dyn InvoiceRepository>,
        catalog_store: Arc<dyn CatalogStore>,
        suppliers: Arc<dyn SupplierDirectory>,
        alert_log: Arc<dyn AlertLog>,
        alert_sender: Arc<dyn AlertSender>,
    ) -> Self {
        let catalog = CatalogResolver::new(catalog_store);
        let batches = BatchStore::new(batch_repo.clone(), catalog.clone());
        let ledger = DistributionLedger::new(distribution_repo);
        let allocator = StockAllocator::new(batches.clone(), ledger.clone());
        let reconciler = InvoiceReconciler::new(invoice_repo, batch_repo, suppliers.clone());
        let alerter = Arc::new(LowStockAlerter::new(alert_log, alert_sender));

        Self {
            batches,
            ledger,
            allocator,
            reconciler,
            catalog,
            suppliers,
            alerter,
        }
    }

    /// Record a standalone batch (no invoice grouping).
    pub fn create_batch(&self, input: NewBatch) -> DomainResult<Batch> {
        let batch = self.batches.create(input)?;
        info!(batch_id = %batch.id, item_id = %batch.item_id, name = %batch.name, "batch recorded");
        Ok(batch)
    }

    /// Edit a batch and reconcile every invoice that references it.
    ///
    /// The edit re-derives the batch's amounts; affected invoices are then
    /// recomputed from their members' fresh totals in the same call.
    pub fn update_batch(&self, id: BatchId, patch: BatchPatch) -> DomainResult<Batch> {
        let batch = self.batches.update(id, patch)?;
        let reconciled = self.reconciler.recalculate_for_item(batch.item_id)?;
        info!(
            batch_id = %batch.id,
            invoices = reconciled.len(),
            "batch updated, invoices reconciled"
        );
        Ok(batch)
    }

    pub fn batch(&self, id: BatchId) -> DomainResult<Option<Batch>> {
        self.batches.get(id)
    }

    /// Batches for one item, most-recent purchase first.
    pub fn batches_for_item(&self, item_id: ItemId) -> DomainResult<Vec<Batch>> {
        self.batches.find_by_item(item_id)
    }

    /// Newest batch of an item (form prefill; authoritative reorder
    /// threshold).
    pub fn latest_batch(&self, item_id: ItemId) -> DomainResult<Option<Batch>> {
        self.batches.latest_for_item(item_id)
    }

    /// Typeahead over purchase history merged with the curated catalog.
    pub fn search_items(
        &self,
        name_fragment: Option<&str>,
        hsn_fragment: Option<&str>,
    ) -> DomainResult<Vec<ItemSuggestion>> {
        self.batches.search(name_fragment, hsn_fragment)
    }

    /// Finalize a purchase entry: create every line as a batch tagged with
    /// the invoice number and supplier snapshot, register each item identity
    /// with the catalog, group the batches under a new invoice, and back-link
    /// each batch to it.
    pub fn finalize_purchase(&self, draft: PurchaseDraft) -> DomainResult<PurchaseRecord> {
        if draft.lines.is_empty() {
            return Err(DomainError::validation(
                "a purchase needs at least one line",
            ));
        }
        let supplier = self.suppliers.resolve(draft.supplier_id)?;

        let mut members = Vec::with_capacity(draft.lines.len());
        for line in draft.lines {
            let batch = self.batches.create(NewBatch {
                purchase_date: line.purchase_date.or(draft.purchase_date),
                supplier: Some(supplier.clone()),
                invoice_number: Some(draft.invoice_number.clone()),
                ..line
            })?;
            self.catalog.sync_from_batch(KnownItem {
                item_id: batch.item_id,
                name: batch.name.clone(),
                unit: batch.unit.clone(),
                category: batch.category.clone(),
                hsn_code: batch.hsn_code.clone(),
            })?;
            members.push(batch);
        }

        let invoice = self.reconciler.create(
            NewInvoice {
                invoice_number: draft.invoice_number,
                supplier_id: draft.supplier_id,
                cgst_percent: draft.cgst_percent,
                sgst_percent: draft.sgst_percent,
                purchase_date: draft.purchase_date,
            },
            &members,
        )?;

        let mut batches = Vec::with_capacity(members.len());
        for member in members {
            batches.push(self.batches.link_invoice(member.id, invoice.id)?);
        }

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            batches = batches.len(),
            total = %invoice.total_after_tax,
            "purchase finalized"
        );
        Ok(PurchaseRecord { invoice, batches })
    }

    pub fn invoice(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        self.reconciler.invoice(id)
    }

    /// Recompute totals of every invoice touching an item's batches.
    pub fn reconcile_invoices_for_item(&self, item_id: ItemId) -> DomainResult<Vec<Invoice>> {
        self.reconciler.recalculate_for_item(item_id)
    }

    /// Change an invoice's number and supplier, cascading the new identity
    /// onto the batches tagged with the old number. Amounts stay untouched.
    pub fn change_invoice_identity(
        &self,
        invoice_id: InvoiceId,
        new_invoice_number: &str,
        new_supplier_id: SupplierId,
    ) -> DomainResult<Invoice> {
        let invoice =
            self.reconciler
                .change_identity(invoice_id, new_invoice_number, new_supplier_id)?;
        info!(invoice_id = %invoice.id, invoice_number = %invoice.invoice_number, "invoice identity changed");
        Ok(invoice)
    }

    /// Record a stock issue out of inventory.
    pub fn record_distribution(&self, input: NewDistribution) -> DomainResult<Distribution> {
        let event = self.ledger.record(input)?;
        info!(item_id = %event.item_id, quantity = %event.quantity, destination = %event.destination, "distribution recorded");
        Ok(event)
    }

    /// Issue history for an item, newest first.
    pub fn distributions_for_item(&self, item_id: ItemId) -> DomainResult<Vec<Distribution>> {
        self.ledger.events_for(item_id)
    }

    /// Total quantity ever issued for an item.
    pub fn total_distributed_for_item(&self, item_id: ItemId) -> DomainResult<Decimal> {
        self.ledger.total_distributed(item_id)
    }

    /// Derived remaining stock for an item (read-time LIFO replay).
    pub fn allocate(&self, item_id: ItemId) -> DomainResult<ItemAllocation> {
        self.allocator.allocate(item_id)
    }

    /// The stock register: one two-bucket row per item, sorted by name.
    pub fn stock_register(&self) -> DomainResult<Vec<StockRegisterRow>> {
        self.allocator.stock_register()
    }

    /// Out-of-stock / low-stock classification across all items.
    pub fn low_stock_report(&self) -> DomainResult<StockHealthReport> {
        self.allocator.low_stock_report()
    }

    /// Bulk-import catalog reference rows. Returns the number inserted.
    pub fn import_catalog(&self, rows: Vec<CatalogRow>) -> DomainResult<usize> {
        let accepted = self.catalog.bulk_import(rows)?;
        info!(accepted, "catalog rows imported");
        Ok(accepted)
    }

    /// Compute the low-stock report and send a throttled alert for it.
    pub fn run_low_stock_alert(&self, now: DateTime<Utc>) -> DomainResult<AlertOutcome> {
        let report = self.low_stock_report()?;
        debug!(
            low = report.low_stock.len(),
            out = report.out_of_stock.len(),
            "low-stock sweep"
        );
        self.alerter.notify(&report.low_stock, now)
    }
}
