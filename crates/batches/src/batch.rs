use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invtrack_core::{
    percent_from_parts, percent_of, round_currency, with_tax, BatchId, DomainError, DomainResult,
    InvoiceId, ItemId,
};
use invtrack_parties::SupplierSnapshot;

/// One purchase-delivery line for one item.
///
/// Item classification (`name`, `unit`, `category`, `hsn_code`) and the
/// supplier snapshot are duplicated per batch for historical accuracy: a
/// later rename must not alter old batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub item_id: ItemId,
    /// Set once the batch is grouped under a finalized invoice.
    pub invoice_id: Option<InvoiceId>,
    /// Historical invoice-number tag; the identity cascade keys on it.
    pub invoice_number: Option<String>,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub hsn_code: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// `quantity * unit_price`, rounded to 2 dp.
    pub gross_amount: Decimal,
    /// Stored unrounded.
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    /// Stored unrounded.
    pub gst_percent: Decimal,
    /// `gross_amount - discount_amount`, rounded to 2 dp.
    pub net_amount: Decimal,
    /// `net_amount * (1 + gst_percent/100)`, rounded to 2 dp.
    pub taxed_total: Decimal,
    pub purchase_date: DateTime<Utc>,
    /// Reorder threshold; the newest batch's value is authoritative for the
    /// item.
    pub min_reorder_level: Decimal,
    pub supplier_id: Option<invtrack_core::SupplierId>,
    pub supplier_company_name: Option<String>,
    pub supplier_phone: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Input for creating a batch. `item_id` absent means "mint a new identity".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBatch {
    pub item_id: Option<ItemId>,
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount_percent: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub gst_percent: Option<Decimal>,
    pub min_reorder_level: Option<Decimal>,
    pub category: Option<String>,
    pub hsn_code: Option<String>,
    /// Defaults to the creation time when unspecified.
    pub purchase_date: Option<DateTime<Utc>>,
    pub supplier: Option<SupplierSnapshot>,
    pub invoice_number: Option<String>,
}

/// Partial edit of a batch. Absent fields keep their current value; amount
/// fields are always re-derived after the patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    /// On update the discount is percent-driven only; the amount is always
    /// derived from this (unlike create, which accepts either as the driving
    /// input).
    pub discount_percent: Option<Decimal>,
    pub gst_percent: Option<Decimal>,
    pub min_reorder_level: Option<Decimal>,
    pub category: Option<String>,
    pub hsn_code: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pricing {
    gross_amount: Decimal,
    discount_percent: Decimal,
    discount_amount: Decimal,
    net_amount: Decimal,
    taxed_total: Decimal,
}

/// Derive all amount fields from the driving inputs.
///
/// Exactly one of percent/amount is expected from the caller; when only one
/// is nonzero the other is derived, and when both are supplied they are
/// trusted as given (no cross-check). A discount driving the net below zero
/// is rejected before anything is persisted.
fn derive_pricing(
    quantity: Decimal,
    unit_price: Decimal,
    discount_percent: Decimal,
    discount_amount: Decimal,
    gst_percent: Decimal,
) -> DomainResult<Pricing> {
    let gross = quantity * unit_price;

    let mut percent = discount_percent;
    let mut amount = discount_amount;
    if percent > Decimal::ZERO && amount.is_zero() {
        amount = percent_of(gross, percent);
    } else if amount > Decimal::ZERO && percent.is_zero() {
        percent = percent_from_parts(amount, gross);
    }

    let net = gross - amount;
    if net < Decimal::ZERO {
        return Err(DomainError::invalid_discount(format!(
            "discount {amount} exceeds gross amount {gross}"
        )));
    }

    let net = round_currency(net);
    Ok(Pricing {
        gross_amount: round_currency(gross),
        discount_percent: percent,
        discount_amount: round_currency(amount),
        net_amount: net,
        taxed_total: round_currency(with_tax(net, gst_percent)),
    })
}

fn require_positive(value: Decimal, field: &str) -> DomainResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "{field} must be positive"
        )));
    }
    Ok(value)
}

fn require_percent_range(value: Decimal, field: &str) -> DomainResult<Decimal> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(DomainError::validation(format!(
            "{field} must be between 0 and 100"
        )));
    }
    Ok(value)
}

fn require_non_negative(value: Decimal, field: &str) -> DomainResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "{field} cannot be negative"
        )));
    }
    Ok(value)
}

impl Batch {
    /// Validate and derive a new batch record.
    ///
    /// `now` is the creation instant; it backs both `recorded_at` and the
    /// `purchase_date` default.
    pub fn try_new(input: NewBatch, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if input.unit.trim().is_empty() {
            return Err(DomainError::validation("unit is required"));
        }
        let quantity = require_positive(input.quantity, "quantity")?;
        let unit_price = require_positive(input.unit_price, "unit price")?;

        let discount_percent =
            require_percent_range(input.discount_percent.unwrap_or_default(), "discount percent")?;
        let discount_amount =
            require_non_negative(input.discount_amount.unwrap_or_default(), "discount amount")?;
        let gst_percent = require_non_negative(input.gst_percent.unwrap_or_default(), "gst percent")?;
        let min_reorder_level =
            require_non_negative(input.min_reorder_level.unwrap_or_default(), "reorder level")?;

        let pricing = derive_pricing(
            quantity,
            unit_price,
            discount_percent,
            discount_amount,
            gst_percent,
        )?;

        let (supplier_id, supplier_company_name, supplier_phone) = match input.supplier {
            Some(s) => (Some(s.supplier_id), Some(s.company_name), s.phone),
            None => (None, None, None),
        };

        Ok(Self {
            id: BatchId::new(),
            item_id: input.item_id.unwrap_or_default(),
            invoice_id: None,
            invoice_number: input.invoice_number,
            name: input.name.trim().to_string(),
            unit: input.unit.trim().to_string(),
            category: input.category,
            hsn_code: input.hsn_code,
            quantity,
            unit_price,
            gross_amount: pricing.gross_amount,
            discount_percent: pricing.discount_percent,
            discount_amount: pricing.discount_amount,
            gst_percent,
            net_amount: pricing.net_amount,
            taxed_total: pricing.taxed_total,
            purchase_date: input.purchase_date.unwrap_or(now),
            min_reorder_level,
            supplier_id,
            supplier_company_name,
            supplier_phone,
            recorded_at: now,
        })
    }

    /// Apply an edit and re-derive every amount field.
    ///
    /// Unlike create, the discount here is percent-driven only: the stored
    /// amount is always recomputed as `gross * percent / 100`.
    pub fn apply_patch(&self, patch: BatchPatch) -> DomainResult<Self> {
        let mut updated = self.clone();

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name is required"));
            }
            updated.name = name.trim().to_string();
        }
        if let Some(unit) = patch.unit {
            if unit.trim().is_empty() {
                return Err(DomainError::validation("unit is required"));
            }
            updated.unit = unit.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            updated.quantity = require_positive(quantity, "quantity")?;
        }
        if let Some(unit_price) = patch.unit_price {
            updated.unit_price = require_positive(unit_price, "unit price")?;
        }
        if let Some(percent) = patch.discount_percent {
            updated.discount_percent = require_percent_range(percent, "discount percent")?;
        }
        if let Some(gst) = patch.gst_percent {
            updated.gst_percent = require_non_negative(gst, "gst percent")?;
        }
        if let Some(level) = patch.min_reorder_level {
            updated.min_reorder_level = require_non_negative(level, "reorder level")?;
        }
        if let Some(category) = patch.category {
            updated.category = Some(category);
        }
        if let Some(hsn) = patch.hsn_code {
            updated.hsn_code = Some(hsn);
        }
        if let Some(date) = patch.purchase_date {
            updated.purchase_date = date;
        }

        let gross = updated.quantity * updated.unit_price;
        let amount = percent_of(gross, updated.discount_percent);
        let pricing = derive_pricing(
            updated.quantity,
            updated.unit_price,
            updated.discount_percent,
            amount,
            updated.gst_percent,
        )?;

        updated.gross_amount = pricing.gross_amount;
        updated.discount_amount = pricing.discount_amount;
        updated.net_amount = pricing.net_amount;
        updated.taxed_total = pricing.taxed_total;
        Ok(updated)
    }

    /// Restamp invoice identity and supplier snapshot (cascade from an
    /// invoice edit). Amounts are untouched.
    pub fn restamp_identity(&mut self, invoice_number: &str, supplier: &SupplierSnapshot) {
        self.invoice_number = Some(invoice_number.to_string());
        self.supplier_id = Some(supplier.supplier_id);
        self.supplier_company_name = Some(supplier.company_name.clone());
        self.supplier_phone = supplier.phone.clone();
    }
}
