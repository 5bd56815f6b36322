//! `invtrack-parties` — supplier identity.
//!
//! Supplier master data CRUD is an external collaborator; this crate only
//! defines the snapshot the ledger denormalizes onto batches and the lookup
//! seam the reconciler resolves suppliers through.

pub mod supplier;

pub use supplier::{SupplierDirectory, SupplierSnapshot};
