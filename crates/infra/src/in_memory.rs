//! In-memory document-store stand-ins.
//!
//! All collections preserve insertion order, mirroring the ordering contract
//! the repositories promise. Lock poisoning surfaces as a storage failure
//! rather than a panic.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use invtrack_alerts::{AlertLog, AlertSender};
use invtrack_allocation::LowStockItem;
use invtrack_batches::{Batch, BatchRepository};
use invtrack_catalog::{CatalogEntry, CatalogStore, KnownItem};
use invtrack_core::{BatchId, DomainError, DomainResult, InvoiceId, ItemId, SupplierId};
use invtrack_distribution::{Distribution, DistributionRepository};
use invtrack_invoicing::{Invoice, InvoiceRepository};
use invtrack_parties::{SupplierDirectory, SupplierSnapshot};

fn read<T>(lock: &RwLock<T>) -> DomainResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| DomainError::storage("store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> DomainResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| DomainError::storage("store lock poisoned"))
}

/// Batch collection.
#[derive(Debug, Default)]
pub struct InMemoryBatchRepository {
    inner: RwLock<Vec<Batch>>,
}

impl InMemoryBatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BatchRepository for InMemoryBatchRepository {
    fn insert(&self, batch: Batch) -> DomainResult<()> {
        write(&self.inner)?.push(batch);
        Ok(())
    }

    fn fetch(&self, id: BatchId) -> DomainResult<Option<Batch>> {
        Ok(read(&self.inner)?.iter().find(|b| b.id == id).cloned())
    }

    fn save(&self, batch: &Batch) -> DomainResult<()> {
        let mut batches = write(&self.inner)?;
        let slot = batches
            .iter_mut()
            .find(|b| b.id == batch.id)
            .ok_or(DomainError::NotFound)?;
        *slot = batch.clone();
        Ok(())
    }

    fn by_item(&self, item_id: ItemId) -> DomainResult<Vec<Batch>> {
        Ok(read(&self.inner)?
            .iter()
            .filter(|b| b.item_id == item_id)
            .cloned()
            .collect())
    }

    fn by_invoice_number(&self, invoice_number: &str) -> DomainResult<Vec<Batch>> {
        Ok(read(&self.inner)?
            .iter()
            .filter(|b| b.invoice_number.as_deref() == Some(invoice_number))
            .cloned()
            .collect())
    }

    fn all(&self) -> DomainResult<Vec<Batch>> {
        Ok(read(&self.inner)?.clone())
    }
}

/// Distribution event collection (append-only).
#[derive(Debug, Default)]
pub struct InMemoryDistributionRepository {
    inner: RwLock<Vec<Distribution>>,
}

impl InMemoryDistributionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DistributionRepository for InMemoryDistributionRepository {
    fn insert(&self, event: Distribution) -> DomainResult<()> {
        write(&self.inner)?.push(event);
        Ok(())
    }

    fn by_item(&self, item_id: ItemId) -> DomainResult<Vec<Distribution>> {
        Ok(read(&self.inner)?
            .iter()
            .filter(|d| d.item_id == item_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> DomainResult<Vec<Distribution>> {
        Ok(read(&self.inner)?.clone())
    }
}

/// Invoice collection.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    inner: RwLock<Vec<Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn insert(&self, invoice: Invoice) -> DomainResult<()> {
        write(&self.inner)?.push(invoice);
        Ok(())
    }

    fn fetch(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        Ok(read(&self.inner)?.iter().find(|i| i.id == id).cloned())
    }

    fn save(&self, invoice: &Invoice) -> DomainResult<()> {
        let mut invoices = write(&self.inner)?;
        let slot = invoices
            .iter_mut()
            .find(|i| i.id == invoice.id)
            .ok_or(DomainError::NotFound)?;
        *slot = invoice.clone();
        Ok(())
    }

    fn referencing_any(&self, batch_ids: &[BatchId]) -> DomainResult<Vec<Invoice>> {
        let wanted: HashSet<_> = batch_ids.iter().collect();
        Ok(read(&self.inner)?
            .iter()
            .filter(|invoice| invoice.batch_ids.iter().any(|id| wanted.contains(id)))
            .cloned()
            .collect())
    }

    fn all(&self) -> DomainResult<Vec<Invoice>> {
        Ok(read(&self.inner)?.clone())
    }
}

#[derive(Debug, Default)]
struct CatalogInner {
    entries: Vec<CatalogEntry>,
    names: HashSet<String>,
    known: HashMap<ItemId, KnownItem>,
}

/// Catalog collections (reference entries + known-item registry), with the
/// insert-if-absent upsert primitive the resolver relies on.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<CatalogInner>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert_entry_if_absent(&self, entry: CatalogEntry) -> DomainResult<bool> {
        let mut inner = write(&self.inner)?;
        if !inner.names.insert(entry.normalized_name()) {
            return Ok(false);
        }
        inner.entries.push(entry);
        Ok(true)
    }

    fn insert_known_item_if_absent(&self, item: KnownItem) -> DomainResult<bool> {
        let mut inner = write(&self.inner)?;
        if inner.known.contains_key(&item.item_id) {
            return Ok(false);
        }
        inner.known.insert(item.item_id, item);
        Ok(true)
    }

    fn entries(&self) -> DomainResult<Vec<CatalogEntry>> {
        Ok(read(&self.inner)?.entries.clone())
    }

    fn known_item(&self, item_id: ItemId) -> DomainResult<Option<KnownItem>> {
        Ok(read(&self.inner)?.known.get(&item_id).cloned())
    }
}

/// Supplier master-data stand-in.
#[derive(Debug, Default)]
pub struct InMemorySupplierDirectory {
    inner: RwLock<HashMap<SupplierId, SupplierSnapshot>>,
}

impl InMemorySupplierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, snapshot: SupplierSnapshot) -> DomainResult<()> {
        write(&self.inner)?.insert(snapshot.supplier_id, snapshot);
        Ok(())
    }
}

impl SupplierDirectory for InMemorySupplierDirectory {
    fn resolve(&self, supplier_id: SupplierId) -> DomainResult<SupplierSnapshot> {
        read(&self.inner)?
            .get(&supplier_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }
}

/// Single last-sent timestamp for the alert throttle.
#[derive(Debug, Default)]
pub struct InMemoryAlertLog {
    inner: RwLock<Option<DateTime<Utc>>>,
}

impl InMemoryAlertLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertLog for InMemoryAlertLog {
    fn last_sent(&self) -> DomainResult<Option<DateTime<Utc>>> {
        Ok(*read(&self.inner)?)
    }

    fn record_sent(&self, at: DateTime<Utc>) -> DomainResult<()> {
        *write(&self.inner)? = Some(at);
        Ok(())
    }
}

/// Alert sink that records what would have been emailed.
#[derive(Debug, Default)]
pub struct RecordingAlertSender {
    sent: Mutex<Vec<Vec<LowStockItem>>>,
}

impl RecordingAlertSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Vec<LowStockItem>> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl AlertSender for RecordingAlertSender {
    fn send(&self, items: &[LowStockItem]) -> DomainResult<()> {
        self.sent
            .lock()
            .map_err(|_| DomainError::storage("sender lock poisoned"))?
            .push(items.to_vec());
        Ok(())
    }
}
