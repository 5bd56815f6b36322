use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invtrack_core::{round_currency, DomainResult, ItemId};

use crate::allocator::StockAllocator;

/// One stock-register line: the two-bucket (existing vs new) remaining view
/// for an item, priced at the latest purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRegisterRow {
    pub item_id: ItemId,
    pub name: String,
    pub hsn_code: Option<String>,
    /// Remaining stock in batches older than the newest.
    pub existing_stock: Decimal,
    /// Remaining stock in the newest batch.
    pub new_stock: Decimal,
    /// Unit price of the newest batch.
    pub unit_price: Decimal,
    /// Σ remaining × that batch's own unit price (not latest-price ×
    /// total).
    pub total_value: Decimal,
}

/// An item with zero (or floored) remaining stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutOfStockItem {
    pub item_id: ItemId,
    pub name: String,
    pub category: Option<String>,
}

/// An item at or below its reorder threshold, with stock still on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub item_id: ItemId,
    pub name: String,
    pub category: Option<String>,
    pub remaining: Decimal,
    pub threshold: Decimal,
}

/// Dashboard-facing stock health summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHealthReport {
    pub total_products: usize,
    pub total_stock: Decimal,
    pub categories: usize,
    pub out_of_stock: Vec<OutOfStockItem>,
    pub low_stock: Vec<LowStockItem>,
}

impl StockAllocator {
    fn distinct_items(&self) -> DomainResult<Vec<ItemId>> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for batch in self.batch_store().all()? {
            if seen.insert(batch.item_id) {
                items.push(batch.item_id);
            }
        }
        Ok(items)
    }

    /// The stock register: one row per item, sorted by name.
    pub fn stock_register(&self) -> DomainResult<Vec<StockRegisterRow>> {
        let mut rows = Vec::new();
        for item_id in self.distinct_items()? {
            let allocation = self.allocate(item_id)?;
            let Some(newest) = allocation.batches.first() else {
                continue;
            };

            let total_value: Decimal = allocation
                .batches
                .iter()
                .map(|standing| standing.remaining * standing.batch.unit_price)
                .sum();

            rows.push(StockRegisterRow {
                item_id,
                name: newest.batch.name.clone(),
                hsn_code: newest.batch.hsn_code.clone(),
                existing_stock: allocation.existing_stock,
                new_stock: allocation.new_stock,
                unit_price: newest.batch.unit_price,
                total_value: round_currency(total_value),
            });
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    /// Classify every item's remaining stock against its newest batch's
    /// reorder threshold.
    pub fn low_stock_report(&self) -> DomainResult<StockHealthReport> {
        let mut total_stock = Decimal::ZERO;
        let mut categories = HashSet::new();
        let mut out_of_stock = Vec::new();
        let mut low_stock = Vec::new();

        let items = self.distinct_items()?;
        let total_products = items.len();

        for item_id in items {
            let allocation = self.allocate(item_id)?;
            let Some(newest) = allocation.batches.first() else {
                continue;
            };
            total_stock += allocation.remaining;
            if let Some(category) = &newest.batch.category {
                categories.insert(category.clone());
            }

            if allocation.remaining <= Decimal::ZERO {
                out_of_stock.push(OutOfStockItem {
                    item_id,
                    name: newest.batch.name.clone(),
                    category: newest.batch.category.clone(),
                });
            } else if allocation.is_below_reorder() {
                low_stock.push(LowStockItem {
                    item_id,
                    name: newest.batch.name.clone(),
                    category: newest.batch.category.clone(),
                    remaining: allocation.remaining,
                    threshold: newest.batch.min_reorder_level,
                });
            }
        }

        Ok(StockHealthReport {
            total_products,
            total_stock,
            categories: categories.len(),
            out_of_stock,
            low_stock,
        })
    }
}
