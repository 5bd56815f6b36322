//! `invtrack-invoicing` — purchase invoices and reconciliation.
//!
//! An [`Invoice`] groups the batches bought in one supplier visit. Its tax
//! totals are never hand-edited: they are a pure function of the current
//! member batches' amounts, recomputed whenever any member changes.

pub mod invoice;
pub mod reconciler;
pub mod repo;

pub use invoice::{Invoice, NewInvoice};
pub use reconciler::InvoiceReconciler;
pub use repo::InvoiceRepository;
