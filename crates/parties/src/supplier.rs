use std::sync::Arc;

use serde::{Deserialize, Serialize};

use invtrack_core::{DomainResult, SupplierId};

/// Denormalized supplier details captured at the time of purchase.
///
/// Copied onto every batch so historical invoices keep the contact details
/// the goods were actually bought under, even after the supplier record
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSnapshot {
    pub supplier_id: SupplierId,
    pub company_name: String,
    pub phone: Option<String>,
}

/// Lookup into the external supplier master data.
///
/// Returns [`DomainError::NotFound`](invtrack_core::DomainError::NotFound)
/// when the supplier id does not resolve.
pub trait SupplierDirectory: Send + Sync {
    fn resolve(&self, supplier_id: SupplierId) -> DomainResult<SupplierSnapshot>;
}

impl<S> SupplierDirectory for Arc<S>
where
    S: SupplierDirectory + ?Sized,
{
    fn resolve(&self, supplier_id: SupplierId) -> DomainResult<SupplierSnapshot> {
        (**self).resolve(supplier_id)
    }
}
