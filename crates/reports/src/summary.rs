//! Branch and period rollups.
//!
//! Money totals saturate at the `i64` bounds, so a report never fails.

use serde::{Deserialize, Serialize};

use stockbook_core::{BranchName, ValueObject};
use stockbook_inventory::{Movement, MovementTotals, totals};
use stockbook_products::{Catalog, DEFAULT_LOW_STOCK_THRESHOLD, Product, is_low_stock};

use crate::records::{Bonus, Expense, Sale};
use crate::scope::ReportScope;

/// Reporting policy knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Products with at most this many sellable units count as low stock.
    pub low_stock_threshold: i64,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

/// Snapshots a report is computed from. Nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub catalog: &'a Catalog,
    pub sales: &'a [Sale],
    pub movements: &'a [Movement],
    pub expenses: &'a [Expense],
    pub bonuses: &'a [Bonus],
}

/// Rollup for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub branch_name: Option<BranchName>,
    pub revenue: i64,
    pub profit: i64,
    /// Expenses plus bonuses.
    pub expenses_total: i64,
    pub net: i64,
    pub sales_count: usize,
    pub low_stock_count: usize,
    pub movements: MovementTotals,
    /// Scoped sales, newest effective date first.
    pub sales: Vec<Sale>,
}

impl ValueObject for BranchSummary {}

/// Compute the rollup for `scope`.
pub fn summarize(scope: &ReportScope, inputs: &ReportInputs<'_>, config: &ReportsConfig) -> BranchSummary {
    let period = scope.period;

    let mut sales: Vec<Sale> = inputs
        .sales
        .iter()
        .filter(|s| scope.covers(s.branch_name.as_ref(), s.manager_id, s.manager_name.as_deref()))
        .filter(|s| period.contains(s.effective_date()))
        .cloned()
        .collect();
    sales.sort_by(|a, b| b.effective_date().cmp(&a.effective_date()));

    let revenue = saturating_sum(sales.iter().map(|s| s.total));
    let profit = saturating_sum(sales.iter().map(Sale::profit));

    let expenses = saturating_sum(
        inputs
            .expenses
            .iter()
            .filter(|e| scope.covers(e.branch_name.as_ref(), e.staff_id, e.staff_name.as_deref()))
            .filter(|e| period.contains(e.created_at))
            .map(|e| e.amount),
    );
    let bonuses = saturating_sum(
        inputs
            .bonuses
            .iter()
            .filter(|b| scope.covers(b.branch_name.as_ref(), b.staff_id, b.staff_name.as_deref()))
            .filter(|b| period.contains(b.created_at))
            .map(|b| b.amount),
    );
    let expenses_total = expenses.saturating_add(bonuses);

    let movements = totals(
        inputs
            .movements
            .iter()
            .filter(|m| scope.covers(m.branch_name.as_ref(), None, m.actor_name.as_deref()))
            .filter(|m| period.contains(m.created_at)),
    );

    // Stock is a current snapshot; the period does not apply to it.
    let low_stock_count = low_stock_products(scope, inputs.catalog, config.low_stock_threshold).len();

    let summary = BranchSummary {
        branch_name: scope.branch_name.clone(),
        revenue,
        profit,
        expenses_total,
        net: profit.saturating_sub(expenses_total),
        sales_count: sales.len(),
        low_stock_count,
        movements,
        sales,
    };

    tracing::debug!(
        branch = summary.branch_name.as_ref().map(BranchName::as_str),
        revenue = summary.revenue,
        net = summary.net,
        low_stock = summary.low_stock_count,
        "branch summary computed"
    );

    summary
}

fn saturating_sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

/// One summary per scope, in the order given.
pub fn summarize_all(scopes: &[ReportScope], inputs: &ReportInputs<'_>, config: &ReportsConfig) -> Vec<BranchSummary> {
    scopes.iter().map(|scope| summarize(scope, inputs, config)).collect()
}

/// Products in the scope's branch whose sellable quantity is at or below `threshold`.
pub fn low_stock_products<'a>(scope: &ReportScope, catalog: &'a Catalog, threshold: i64) -> Vec<&'a Product> {
    catalog
        .iter()
        .filter(|p| scope.covers_branch(p.branch_name.as_ref()))
        .filter(|p| is_low_stock(p, catalog, threshold))
        .collect()
}
