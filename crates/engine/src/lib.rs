//! `invtrack-engine` — the application facade.
//!
//! Wires every service over one set of storage ports and sequences the
//! cross-service effects: purchase finalization (batches + invoice +
//! catalog), batch edits with invoice reconciliation, and the low-stock
//! alert sweep. Callers (HTTP handlers, jobs) talk to this type only.

pub mod engine;

pub use engine::{PurchaseDraft, PurchaseRecord, StockLedgerEngine};
