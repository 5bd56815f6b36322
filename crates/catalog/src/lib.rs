//! `invtrack-catalog` — master catalog for item identity and input assist.
//!
//! The catalog is never authoritative for stock math. It holds two
//! lightweight registries: curated name/HSN reference entries (bulk-imported
//! from spreadsheets) and "known items" keyed by stable item identity, so a
//! repeat purchase can reuse an existing [`ItemId`](invtrack_core::ItemId)
//! instead of minting a new one.

pub mod entry;
pub mod resolver;
pub mod store;

pub use entry::{normalized_name, CatalogEntry, CatalogRow, KnownItem};
pub use resolver::CatalogResolver;
pub use store::CatalogStore;
