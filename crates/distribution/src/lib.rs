//! `invtrack-distribution` — the distribution ledger.
//!
//! A [`Distribution`] is one issue/withdrawal of stock out of inventory to a
//! destination. Events reference item identity only — never a specific batch;
//! which batch a withdrawal depleted is derived on read by the stock
//! allocator. Events are immutable once recorded.

pub mod event;
pub mod ledger;
pub mod repo;

pub use event::{Distribution, NewDistribution};
pub use ledger::DistributionLedger;
pub use repo::DistributionRepository;
