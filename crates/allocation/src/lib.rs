//! `invtrack-allocation` — the stock allocator.
//!
//! Remaining stock is a derived, read-time view: total distributed quantity
//! is replayed against an item's batches newest-first (LIFO) and never
//! persisted, so stock math cannot drift from the ledgers it is computed
//! from. Reporting views (stock register, low-stock health) are built on the
//! same allocation.

pub mod allocator;
pub mod report;

pub use allocator::{deplete_lifo, BatchStanding, ItemAllocation, StockAllocator};
pub use report::{LowStockItem, OutOfStockItem, StockHealthReport, StockRegisterRow};
