use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use invtrack_core::{DomainResult, ItemId};

use crate::event::{Distribution, NewDistribution};
use crate::repo::DistributionRepository;

/// Service over the append-only distribution ledger.
#[derive(Clone)]
pub struct DistributionLedger {
    repo: Arc<dyn DistributionRepository>,
}

impl DistributionLedger {
    pub fn new(repo: Arc<dyn DistributionRepository>) -> Self {
        Self { repo }
    }

    /// Validate and append an issue event.
    pub fn record(&self, input: NewDistribution) -> DomainResult<Distribution> {
        let event = Distribution::try_new(input, Utc::now())?;
        self.repo.insert(event.clone())?;
        Ok(event)
    }

    /// Total quantity ever issued for an item. Pure aggregation.
    pub fn total_distributed(&self, item_id: ItemId) -> DomainResult<Decimal> {
        Ok(self
            .repo
            .by_item(item_id)?
            .iter()
            .map(|event| event.quantity)
            .sum())
    }

    /// Issue history for an item, newest first.
    pub fn events_for(&self, item_id: ItemId) -> DomainResult<Vec<Distribution>> {
        let mut events = self.repo.by_item(item_id)?;
        events.sort_by(|a, b| b.distributed_date.cmp(&a.distributed_date));
        Ok(events)
    }
}
