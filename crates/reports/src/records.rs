//! Sales, expenses and bonuses as the reports consume them, plus the
//! loosely-shaped API records they are resolved from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockbook_core::{BranchName, Entity, ProductId, SaleId, StaffId};

/// Completed sale, as needed for rollups.
///
/// Money fields are in smallest currency unit (e.g., cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub product_id: Option<ProductId>,
    pub branch_name: Option<BranchName>,
    pub manager_id: Option<StaffId>,
    pub manager_name: Option<String>,
    pub quantity: i64,
    pub total: i64,
    /// Unit cost captured at sale time.
    pub cost_snapshot: i64,
    pub staff_earnings: i64,
    pub delivery_cost: i64,
    pub created_at: DateTime<Utc>,
    /// Back-dated sale date entered by staff; overrides `created_at`.
    pub manual_date: Option<DateTime<Utc>>,
}

impl Sale {
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.manual_date.unwrap_or(self.created_at)
    }

    /// Saturates at the `i64` bounds instead of overflowing.
    pub fn profit(&self) -> i64 {
        self.total
            .saturating_sub(self.cost_snapshot.saturating_mul(self.quantity))
            .saturating_sub(self.staff_earnings)
            .saturating_sub(self.delivery_cost)
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Operating expense charged to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: i64,
    pub branch_name: Option<BranchName>,
    pub staff_id: Option<StaffId>,
    pub staff_name: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Bonus paid to a staff member; counted with expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub amount: i64,
    pub branch_name: Option<BranchName>,
    pub staff_id: Option<StaffId>,
    pub staff_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Loosely-shaped sale as delivered by the sales API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleRecord {
    pub id: Option<SaleId>,
    pub product_id: Option<ProductId>,
    pub branch_name: Option<String>,
    pub manager_id: Option<StaffId>,
    pub manager_name: Option<String>,
    pub quantity: Option<i64>,
    pub total: Option<i64>,
    pub cost_snapshot: Option<i64>,
    pub staff_earnings: Option<i64>,
    pub delivery_cost: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub manual_date: Option<DateTime<Utc>>,
}

impl From<SaleRecord> for Sale {
    fn from(record: SaleRecord) -> Self {
        Self {
            id: record.id.unwrap_or_else(|| SaleId::from_uuid(Uuid::nil())),
            product_id: record.product_id,
            branch_name: non_blank(record.branch_name).map(BranchName::from),
            manager_id: record.manager_id,
            manager_name: non_blank(record.manager_name),
            // A sale line always moves at least the unit it was rung up for.
            quantity: record.quantity.unwrap_or(1),
            total: record.total.unwrap_or(0),
            cost_snapshot: record.cost_snapshot.unwrap_or(0),
            staff_earnings: record.staff_earnings.unwrap_or(0),
            delivery_cost: record.delivery_cost.unwrap_or(0),
            created_at: record.created_at.unwrap_or_default(),
            manual_date: record.manual_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseRecord {
    pub amount: Option<i64>,
    pub branch_name: Option<String>,
    pub staff_id: Option<StaffId>,
    pub staff_name: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        Self {
            amount: record.amount.unwrap_or(0),
            branch_name: non_blank(record.branch_name).map(BranchName::from),
            staff_id: record.staff_id,
            staff_name: non_blank(record.staff_name),
            category: non_blank(record.category),
            created_at: record.created_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BonusRecord {
    pub amount: Option<i64>,
    pub branch_name: Option<String>,
    pub staff_id: Option<StaffId>,
    pub staff_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<BonusRecord> for Bonus {
    fn from(record: BonusRecord) -> Self {
        Self {
            amount: record.amount.unwrap_or(0),
            branch_name: non_blank(record.branch_name).map(BranchName::from),
            staff_id: record.staff_id,
            staff_name: non_blank(record.staff_name),
            created_at: record.created_at.unwrap_or_default(),
        }
    }
}
