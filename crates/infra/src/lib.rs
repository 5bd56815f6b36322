//! `invtrack-infra` — infrastructure adapters.
//!
//! In-memory implementations of every persistence port, for tests, benches
//! and development. The production document store is an external
//! collaborator implementing the same traits.

pub mod in_memory;

#[cfg(test)]
mod integration_tests;

pub use in_memory::{
    InMemoryAlertLog, InMemoryBatchRepository, InMemoryCatalogStore,
    InMemoryDistributionRepository, InMemoryInvoiceRepository, InMemorySupplierDirectory,
    RecordingAlertSender,
};
