use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invtrack_batches::Batch;
use invtrack_core::{
    percent_of, round_currency, BatchId, DomainError, DomainResult, InvoiceId, SupplierId,
};

/// Purchase-history record grouping one or more batches from a single
/// supplier visit.
///
/// Invariant after any recomputation:
/// `total_after_tax = total_before_tax + cgst_amount + sgst_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub supplier_id: SupplierId,
    /// Member batches, in purchase-entry order.
    pub batch_ids: Vec<BatchId>,
    /// Stored unrounded.
    pub cgst_percent: Decimal,
    /// Stored unrounded.
    pub sgst_percent: Decimal,
    /// Σ taxed_total of member batches, rounded to 2 dp.
    pub total_before_tax: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub total_after_tax: Decimal,
    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an invoice; totals are derived from the member batches,
/// never supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub supplier_id: SupplierId,
    pub cgst_percent: Decimal,
    pub sgst_percent: Decimal,
    pub purchase_date: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Build an invoice over its member batches, deriving all totals.
    pub fn try_new(input: NewInvoice, members: &[Batch], now: DateTime<Utc>) -> DomainResult<Self> {
        if input.invoice_number.trim().is_empty() {
            return Err(DomainError::validation("invoice number is required"));
        }
        if members.is_empty() {
            return Err(DomainError::validation(
                "an invoice needs at least one batch",
            ));
        }
        if input.cgst_percent < Decimal::ZERO || input.sgst_percent < Decimal::ZERO {
            return Err(DomainError::validation("tax percent cannot be negative"));
        }

        let mut invoice = Self {
            id: InvoiceId::new(),
            invoice_number: input.invoice_number.trim().to_string(),
            supplier_id: input.supplier_id,
            batch_ids: members.iter().map(|batch| batch.id).collect(),
            cgst_percent: input.cgst_percent,
            sgst_percent: input.sgst_percent,
            total_before_tax: Decimal::ZERO,
            cgst_amount: Decimal::ZERO,
            sgst_amount: Decimal::ZERO,
            total_after_tax: Decimal::ZERO,
            purchase_date: input.purchase_date.unwrap_or(now),
            created_at: now,
        };
        invoice.recompute_totals(members);
        Ok(invoice)
    }

    /// Re-derive every total from the current member batches.
    ///
    /// Totals are a pure function of the members: calling this with the same
    /// batches always yields the same amounts.
    pub fn recompute_totals(&mut self, members: &[Batch]) {
        let before: Decimal = members.iter().map(|batch| batch.taxed_total).sum();
        self.total_before_tax = round_currency(before);
        self.cgst_amount = round_currency(percent_of(self.total_before_tax, self.cgst_percent));
        self.sgst_amount = round_currency(percent_of(self.total_before_tax, self.sgst_percent));
        self.total_after_tax = self.total_before_tax + self.cgst_amount + self.sgst_amount;
    }
}
