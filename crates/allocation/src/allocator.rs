use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invtrack_batches::{Batch, BatchStore};
use invtrack_core::{DomainResult, ItemId};
use invtrack_distribution::DistributionLedger;

/// One batch with its derived depletion state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStanding {
    pub batch: Batch,
    /// Quantity of this batch consumed by distributions.
    pub consumed: Decimal,
    /// `batch.quantity - consumed`; never negative.
    pub remaining: Decimal,
}

/// Derived remaining-stock view for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAllocation {
    pub item_id: ItemId,
    /// Batches newest-first, each with consumed/remaining.
    pub batches: Vec<BatchStanding>,
    pub total_purchased: Decimal,
    pub total_distributed: Decimal,
    /// Σ remaining across batches.
    pub remaining: Decimal,
    /// Remaining in the single newest batch (the "new stock" register
    /// bucket).
    pub new_stock: Decimal,
    /// Remaining across all older batches.
    pub existing_stock: Decimal,
    /// Distribution quantity beyond total purchased. Silently absorbed by
    /// policy — stock floors at zero — but surfaced here so the condition is
    /// observable.
    pub overrun: Decimal,
}

impl ItemAllocation {
    /// Whether the item has dropped to (or below) the newest batch's reorder
    /// threshold. A zero threshold never flags.
    pub fn is_below_reorder(&self) -> bool {
        let threshold = self
            .batches
            .first()
            .map(|standing| standing.batch.min_reorder_level)
            .unwrap_or_default();
        threshold > Decimal::ZERO && self.remaining <= threshold
    }
}

/// Replay a total distributed quantity against batches newest-first.
///
/// Distributions consume the most recently purchased batch before older
/// ones, only ever within a single item's batches. Returns the per-batch
/// standings and the overrun (excess beyond total purchased, floored out of
/// the batches).
pub fn deplete_lifo(batches: Vec<Batch>, total_distributed: Decimal) -> (Vec<BatchStanding>, Decimal) {
    let mut to_deplete = total_distributed;
    let standings = batches
        .into_iter()
        .map(|batch| {
            let consumed = to_deplete.min(batch.quantity);
            to_deplete -= consumed;
            let remaining = batch.quantity - consumed;
            BatchStanding {
                batch,
                consumed,
                remaining,
            }
        })
        .collect();
    (standings, to_deplete)
}

/// Read-time stock computation over the batch store and distribution ledger.
#[derive(Clone)]
pub struct StockAllocator {
    batches: BatchStore,
    ledger: DistributionLedger,
}

impl StockAllocator {
    pub fn new(batches: BatchStore, ledger: DistributionLedger) -> Self {
        Self { batches, ledger }
    }

    pub(crate) fn batch_store(&self) -> &BatchStore {
        &self.batches
    }

    /// Derive remaining stock per batch and for the item as a whole.
    pub fn allocate(&self, item_id: ItemId) -> DomainResult<ItemAllocation> {
        let batches = self.batches.find_by_item(item_id)?;
        let total_distributed = self.ledger.total_distributed(item_id)?;

        let total_purchased: Decimal = batches.iter().map(|batch| batch.quantity).sum();
        let (standings, overrun) = deplete_lifo(batches, total_distributed);

        let remaining: Decimal = standings.iter().map(|standing| standing.remaining).sum();
        let new_stock = standings
            .first()
            .map(|standing| standing.remaining)
            .unwrap_or_default();

        Ok(ItemAllocation {
            item_id,
            total_purchased,
            total_distributed,
            remaining,
            new_stock,
            existing_stock: remaining - new_stock,
            overrun,
            batches: standings,
        })
    }
}
