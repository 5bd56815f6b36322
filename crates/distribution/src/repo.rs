use std::sync::Arc;

use invtrack_core::{DomainResult, ItemId};

use crate::event::Distribution;

/// Persistence port for distribution events. Append-only: there is no update
/// or delete in this ledger.
pub trait DistributionRepository: Send + Sync {
    fn insert(&self, event: Distribution) -> DomainResult<()>;

    /// All events for one item, in no particular order.
    fn by_item(&self, item_id: ItemId) -> DomainResult<Vec<Distribution>>;

    fn all(&self) -> DomainResult<Vec<Distribution>>;
}

impl<R> DistributionRepository for Arc<R>
where
    R: DistributionRepository + ?Sized,
{
    fn insert(&self, event: Distribution) -> DomainResult<()> {
        (**self).insert(event)
    }

    fn by_item(&self, item_id: ItemId) -> DomainResult<Vec<Distribution>> {
        (**self).by_item(item_id)
    }

    fn all(&self) -> DomainResult<Vec<Distribution>> {
        (**self).all()
    }
}
