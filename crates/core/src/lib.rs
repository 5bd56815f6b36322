//! `invtrack-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error model, and currency math helpers shared
//! by every other crate in the workspace.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{BatchId, DistributionId, InvoiceId, ItemId, SupplierId};
pub use money::{percent_from_parts, percent_of, round_currency, with_tax};
