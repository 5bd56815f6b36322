use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invtrack_core::{DistributionId, DomainError, DomainResult, ItemId};

/// One issue/withdrawal event. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: DistributionId,
    pub item_id: ItemId,
    pub item_name: String,
    pub unit: String,
    pub destination: String,
    pub receiver: String,
    pub quantity: Decimal,
    pub distributed_date: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

/// Input for recording a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDistribution {
    pub item_id: ItemId,
    pub item_name: String,
    pub unit: String,
    pub destination: String,
    pub receiver: String,
    pub quantity: Decimal,
    /// Defaults to the recording time when unspecified.
    pub distributed_date: Option<DateTime<Utc>>,
}

impl Distribution {
    pub fn try_new(input: NewDistribution, now: DateTime<Utc>) -> DomainResult<Self> {
        if input.quantity <= Decimal::ZERO {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if input.item_name.trim().is_empty() {
            return Err(DomainError::validation("item name is required"));
        }
        if input.destination.trim().is_empty() {
            return Err(DomainError::validation("destination is required"));
        }

        Ok(Self {
            id: DistributionId::new(),
            item_id: input.item_id,
            item_name: input.item_name.trim().to_string(),
            unit: input.unit,
            destination: input.destination.trim().to_string(),
            receiver: input.receiver,
            quantity: input.quantity,
            distributed_date: input.distributed_date.unwrap_or(now),
            recorded_at: now,
        })
    }
}
