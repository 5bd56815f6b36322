//! End-to-end tests wiring the services over the in-memory stores.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use invtrack_allocation::StockAllocator;
use invtrack_batches::{BatchPatch, BatchStore, NewBatch, SuggestionSource};
use invtrack_catalog::{CatalogResolver, CatalogRow};
use invtrack_core::{DomainError, ItemId, SupplierId};
use invtrack_distribution::{DistributionLedger, NewDistribution};
use invtrack_invoicing::{InvoiceReconciler, NewInvoice};
use invtrack_parties::SupplierSnapshot;

use crate::in_memory::{
    InMemoryBatchRepository, InMemoryCatalogStore, InMemoryDistributionRepository,
    InMemoryInvoiceRepository, InMemorySupplierDirectory,
};

struct Harness {
    store: BatchStore,
    ledger: DistributionLedger,
    allocator: StockAllocator,
    reconciler: InvoiceReconciler,
    catalog: CatalogResolver,
    suppliers: Arc<InMemorySupplierDirectory>,
}

fn harness() -> Harness {
    let batch_repo = Arc::new(InMemoryBatchRepository::new());
    let dist_repo = Arc::new(InMemoryDistributionRepository::new());
    let invoice_repo = Arc::new(InMemoryInvoiceRepository::new());
    let catalog_store = Arc::new(InMemoryCatalogStore::new());
    let suppliers = Arc::new(InMemorySupplierDirectory::new());

    let catalog = CatalogResolver::new(catalog_store);
    let store = BatchStore::new(batch_repo.clone(), catalog.clone());
    let ledger = DistributionLedger::new(dist_repo);
    let allocator = StockAllocator::new(store.clone(), ledger.clone());
    let reconciler = InvoiceReconciler::new(invoice_repo, batch_repo, suppliers.clone());

    Harness {
        store,
        ledger,
        allocator,
        reconciler,
        catalog,
        suppliers,
    }
}

fn supplier(h: &Harness, name: &str) -> SupplierSnapshot {
    let snapshot = SupplierSnapshot {
        supplier_id: SupplierId::new(),
        company_name: name.to_string(),
        phone: Some("9876543210".to_string()),
    };
    h.suppliers.register(snapshot.clone()).unwrap();
    snapshot
}

fn new_batch(item_id: Option<ItemId>, name: &str, quantity: Decimal) -> NewBatch {
    NewBatch {
        item_id,
        name: name.to_string(),
        unit: "pcs".to_string(),
        quantity,
        unit_price: dec!(100),
        gst_percent: Some(dec!(5)),
        hsn_code: Some("3917".to_string()),
        ..NewBatch::default()
    }
}

fn distribute(h: &Harness, item_id: ItemId, quantity: Decimal) {
    h.ledger
        .record(NewDistribution {
            item_id,
            item_name: "whatever".to_string(),
            unit: "pcs".to_string(),
            destination: "Block A".to_string(),
            receiver: "Stores".to_string(),
            quantity,
            distributed_date: None,
        })
        .unwrap();
}

#[test]
fn find_by_item_orders_newest_first_with_insertion_tie_break() {
    let h = harness();
    let item_id = ItemId::new();
    let day = Utc::now() - Duration::days(1);

    let older = h
        .store
        .create(NewBatch {
            purchase_date: Some(day - Duration::days(5)),
            ..new_batch(Some(item_id), "Pipe", dec!(1))
        })
        .unwrap();
    let first_today = h
        .store
        .create(NewBatch {
            purchase_date: Some(day),
            ..new_batch(Some(item_id), "Pipe", dec!(2))
        })
        .unwrap();
    let second_today = h
        .store
        .create(NewBatch {
            purchase_date: Some(day),
            ..new_batch(Some(item_id), "Pipe", dec!(3))
        })
        .unwrap();

    let ordered = h.store.find_by_item(item_id).unwrap();
    let ids: Vec<_> = ordered.iter().map(|b| b.id).collect();
    // Equal dates: the later insertion wins the tie.
    assert_eq!(ids, vec![second_today.id, first_today.id, older.id]);
}

#[test]
fn lifo_allocation_matches_expected_remainders() {
    let h = harness();
    let item_id = ItemId::new();
    let now = Utc::now();

    // Purchased oldest → newest: 5, 20, 10.
    for (days_ago, qty) in [(3i64, dec!(5)), (2, dec!(20)), (1, dec!(10))] {
        h.store
            .create(NewBatch {
                purchase_date: Some(now - Duration::days(days_ago)),
                ..new_batch(Some(item_id), "Cement", qty)
            })
            .unwrap();
    }
    distribute(&h, item_id, dec!(15));

    let allocation = h.allocator.allocate(item_id).unwrap();
    let remaining: Vec<_> = allocation.batches.iter().map(|s| s.remaining).collect();
    assert_eq!(remaining, vec![dec!(0), dec!(15), dec!(5)]);
    assert_eq!(allocation.remaining, dec!(20));
    assert_eq!(allocation.new_stock, dec!(0));
    assert_eq!(allocation.existing_stock, dec!(20));
    assert_eq!(allocation.overrun, dec!(0));
}

#[test]
fn over_distribution_floors_every_batch_and_reports_overrun() {
    let h = harness();
    let item_id = ItemId::new();

    for qty in [dec!(10), dec!(20), dec!(5)] {
        h.store
            .create(new_batch(Some(item_id), "Cement", qty))
            .unwrap();
    }
    distribute(&h, item_id, dec!(1000));

    let allocation = h.allocator.allocate(item_id).unwrap();
    assert_eq!(allocation.remaining, dec!(0));
    assert!(allocation
        .batches
        .iter()
        .all(|s| s.remaining == Decimal::ZERO));
    assert_eq!(allocation.overrun, dec!(965));
}

#[test]
fn editing_a_batch_ripples_into_every_containing_invoice() {
    let h = harness();
    let s = supplier(&h, "Sharma Traders");

    let paint = h
        .store
        .create(NewBatch {
            invoice_number: Some("INV-7".to_string()),
            ..new_batch(None, "Paint", dec!(10))
        })
        .unwrap();
    let brush = h
        .store
        .create(NewBatch {
            invoice_number: Some("INV-7".to_string()),
            ..new_batch(None, "Brush", dec!(4))
        })
        .unwrap();

    let invoice = h
        .reconciler
        .create(
            NewInvoice {
                invoice_number: "INV-7".to_string(),
                supplier_id: s.supplier_id,
                cgst_percent: dec!(9),
                sgst_percent: dec!(9),
                purchase_date: None,
            },
            &[paint.clone(), brush.clone()],
        )
        .unwrap();
    // 10*100*1.05 + 4*100*1.05 = 1470
    assert_eq!(invoice.total_before_tax, dec!(1470.00));

    let updated = h
        .store
        .update(
            paint.id,
            BatchPatch {
                quantity: Some(dec!(20)),
                ..BatchPatch::default()
            },
        )
        .unwrap();
    let recalculated = h.reconciler.recalculate_for_item(updated.item_id).unwrap();
    assert_eq!(recalculated.len(), 1);

    let invoice = &recalculated[0];
    let expected_before = updated.taxed_total + brush.taxed_total;
    assert_eq!(invoice.total_before_tax, expected_before);
    assert_eq!(
        invoice.total_after_tax,
        invoice.total_before_tax + invoice.cgst_amount + invoice.sgst_amount
    );
}

#[test]
fn identity_cascade_touches_only_the_old_invoice_number() {
    let h = harness();
    let old_supplier = supplier(&h, "Old Supplier");
    let new_supplier = supplier(&h, "New Supplier");

    let mine = h
        .store
        .create(NewBatch {
            invoice_number: Some("INV-A".to_string()),
            ..new_batch(None, "Wire", dec!(5))
        })
        .unwrap();
    let other = h
        .store
        .create(NewBatch {
            invoice_number: Some("INV-B".to_string()),
            ..new_batch(None, "Switch", dec!(5))
        })
        .unwrap();

    let invoice = h
        .reconciler
        .create(
            NewInvoice {
                invoice_number: "INV-A".to_string(),
                supplier_id: old_supplier.supplier_id,
                cgst_percent: dec!(0),
                sgst_percent: dec!(0),
                purchase_date: None,
            },
            std::slice::from_ref(&mine),
        )
        .unwrap();

    let changed = h
        .reconciler
        .change_identity(invoice.id, "INV-A2", new_supplier.supplier_id)
        .unwrap();
    assert_eq!(changed.invoice_number, "INV-A2");
    assert_eq!(changed.supplier_id, new_supplier.supplier_id);

    let mine_after = h.store.get(mine.id).unwrap().unwrap();
    assert_eq!(mine_after.invoice_number.as_deref(), Some("INV-A2"));
    assert_eq!(mine_after.supplier_id, Some(new_supplier.supplier_id));
    assert_eq!(
        mine_after.supplier_company_name.as_deref(),
        Some("New Supplier")
    );
    // Amounts untouched by an identity cascade.
    assert_eq!(mine_after.taxed_total, mine.taxed_total);

    let other_after = h.store.get(other.id).unwrap().unwrap();
    assert_eq!(other_after.invoice_number.as_deref(), Some("INV-B"));
    assert_eq!(other_after.supplier_id, None);
}

#[test]
fn change_identity_rejects_unresolvable_ids() {
    let h = harness();
    let s = supplier(&h, "Supplier");

    let err = h
        .reconciler
        .change_identity(invtrack_core::InvoiceId::new(), "INV-X", s.supplier_id)
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound);

    let batch = h
        .store
        .create(NewBatch {
            invoice_number: Some("INV-C".to_string()),
            ..new_batch(None, "Tap", dec!(2))
        })
        .unwrap();
    let invoice = h
        .reconciler
        .create(
            NewInvoice {
                invoice_number: "INV-C".to_string(),
                supplier_id: s.supplier_id,
                cgst_percent: dec!(0),
                sgst_percent: dec!(0),
                purchase_date: None,
            },
            &[batch],
        )
        .unwrap();

    let err = h
        .reconciler
        .change_identity(invoice.id, "INV-C2", SupplierId::new())
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[test]
fn update_of_unknown_batch_is_not_found() {
    let h = harness();
    let err = h
        .store
        .update(invtrack_core::BatchId::new(), BatchPatch::default())
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound);
}

#[test]
fn search_merges_history_over_catalog_and_dedups() {
    let h = harness();
    h.catalog
        .bulk_import(vec![
            CatalogRow {
                name: Some("Pipe".to_string()),
                hsn_code: Some("3917".to_string()),
            },
            CatalogRow {
                name: Some("Pipe Wrench".to_string()),
                hsn_code: Some("8204".to_string()),
            },
        ])
        .unwrap();
    h.store.create(new_batch(None, "Pipe", dec!(5))).unwrap();

    let hits = h.store.search(Some("pipe"), None).unwrap();
    assert_eq!(hits.len(), 2);
    // History wins the duplicate "pipe"; the catalog-only name survives.
    assert_eq!(hits[0].source, SuggestionSource::History);
    assert_eq!(hits[0].name, "Pipe");
    assert!(hits[0].item_id.is_some());
    assert_eq!(hits[1].source, SuggestionSource::Catalog);
    assert_eq!(hits[1].name, "Pipe Wrench");
}

#[test]
fn search_caps_merged_results() {
    let h = harness();
    for i in 0..12 {
        h.store
            .create(new_batch(None, &format!("Bolt M{i}"), dec!(1)))
            .unwrap();
    }
    let rows = (0..12)
        .map(|i| CatalogRow {
            name: Some(format!("Bolt Anchor {i}")),
            hsn_code: Some("7318".to_string()),
        })
        .collect();
    h.catalog.bulk_import(rows).unwrap();

    let hits = h.store.search(Some("bolt"), None).unwrap();
    assert_eq!(hits.len(), invtrack_batches::SEARCH_RESULT_LIMIT);
}

#[test]
fn stock_register_buckets_existing_and_new_stock() {
    let h = harness();
    let item_id = ItemId::new();
    let now = Utc::now();

    h.store
        .create(NewBatch {
            purchase_date: Some(now - Duration::days(2)),
            unit_price: dec!(90),
            ..new_batch(Some(item_id), "Sand Bag", dec!(30))
        })
        .unwrap();
    h.store
        .create(NewBatch {
            purchase_date: Some(now),
            unit_price: dec!(110),
            ..new_batch(Some(item_id), "Sand Bag", dec!(10))
        })
        .unwrap();
    distribute(&h, item_id, dec!(4));

    let register = h.allocator.stock_register().unwrap();
    assert_eq!(register.len(), 1);
    let row = &register[0];
    assert_eq!(row.new_stock, dec!(6));
    assert_eq!(row.existing_stock, dec!(30));
    assert_eq!(row.unit_price, dec!(110));
    // 6 * 110 + 30 * 90
    assert_eq!(row.total_value, dec!(3360.00));
}

#[test]
fn low_stock_report_classifies_items() {
    let h = harness();
    let healthy = ItemId::new();
    let low = ItemId::new();
    let empty = ItemId::new();

    h.store
        .create(new_batch(Some(healthy), "Healthy", dec!(100)))
        .unwrap();
    h.store
        .create(NewBatch {
            min_reorder_level: Some(dec!(10)),
            ..new_batch(Some(low), "Low", dec!(12))
        })
        .unwrap();
    h.store
        .create(new_batch(Some(empty), "Empty", dec!(5)))
        .unwrap();

    distribute(&h, low, dec!(4));
    distribute(&h, empty, dec!(5));

    let report = h.allocator.low_stock_report().unwrap();
    assert_eq!(report.total_products, 3);
    assert_eq!(report.total_stock, dec!(108));
    assert_eq!(report.out_of_stock.len(), 1);
    assert_eq!(report.out_of_stock[0].name, "Empty");
    assert_eq!(report.low_stock.len(), 1);
    assert_eq!(report.low_stock[0].name, "Low");
    assert_eq!(report.low_stock[0].remaining, dec!(8));
    assert_eq!(report.low_stock[0].threshold, dec!(10));
}
