//! Stock movements: one append-only ledger entry per stock change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockbook_core::{BranchName, Entity, MovementId, ProductId};

use crate::operation::OperationType;

/// Which way a movement moves stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    Adjustment,
}

impl Direction {
    /// Parse a wire value. Anything that is not `in`/`out` is an adjustment.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "in" => Direction::In,
            "out" => Direction::Out,
            _ => Direction::Adjustment,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::Adjustment => "adjustment",
        }
    }
}

/// Ledger entry (immutable once written).
///
/// `stock_after` is the on-hand quantity recorded by the store at write time.
/// It is a point-in-time snapshot and is never recomputed from other entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub created_at: DateTime<Utc>,
    pub product_id: ProductId,
    pub branch_name: Option<BranchName>,
    pub direction: Direction,
    pub operation_type: Option<OperationType>,
    /// Magnitude; the sign comes from `direction`.
    pub quantity: i64,
    pub stock_after: i64,
    pub reason: Option<String>,
    pub actor_name: Option<String>,
}

impl Entity for Movement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Loosely-shaped movement as delivered by the ledger API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovementRecord {
    pub id: Option<MovementId>,
    pub created_at: Option<DateTime<Utc>>,
    pub product_id: Option<ProductId>,
    pub branch_name: Option<String>,
    pub direction: Option<String>,
    pub operation_type: Option<String>,
    pub quantity: Option<i64>,
    pub stock_after: Option<i64>,
    pub reason: Option<String>,
    pub actor_name: Option<String>,
}

impl From<MovementRecord> for Movement {
    fn from(record: MovementRecord) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            id: record.id.unwrap_or_else(|| MovementId::from_uuid(Uuid::nil())),
            created_at: record.created_at.unwrap_or_default(),
            product_id: record
                .product_id
                .unwrap_or_else(|| ProductId::from_uuid(Uuid::nil())),
            branch_name: non_blank(record.branch_name).map(BranchName::from),
            direction: record
                .direction
                .as_deref()
                .map_or(Direction::Adjustment, Direction::from_wire),
            // Unknown operation names are left for the classifier to infer.
            operation_type: record
                .operation_type
                .as_deref()
                .and_then(|s| s.parse().ok()),
            quantity: record.quantity.unwrap_or(0),
            stock_after: record.stock_after.unwrap_or(0),
            reason: non_blank(record.reason),
            actor_name: non_blank(record.actor_name),
        }
    }
}
