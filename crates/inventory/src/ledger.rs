//! Movement ledger projections.
//!
//! Read-only shaping of a movement snapshot for history screens: scoping,
//! newest-first ordering and display fields. Stock levels are always the
//! recorded `stock_after` of each entry; running balances are never replayed.

use serde::{Deserialize, Serialize};

use stockbook_core::{BranchName, ProductId};

use crate::classifier::Classifier;
use crate::movement::{Direction, Movement};
use crate::operation::OperationType;

/// Which slice of the ledger a query looks at.
///
/// An empty scope matches every movement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerScope {
    pub product_id: Option<ProductId>,
    pub branch_name: Option<BranchName>,
}

impl LedgerScope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            branch_name: None,
        }
    }

    pub fn for_branch(branch: impl Into<BranchName>) -> Self {
        Self {
            product_id: None,
            branch_name: Some(branch.into()),
        }
    }

    pub fn and_branch(mut self, branch: impl Into<BranchName>) -> Self {
        self.branch_name = Some(branch.into());
        self
    }

    pub fn matches(&self, movement: &Movement) -> bool {
        let product_ok = self.product_id.is_none_or(|id| movement.product_id == id);
        let branch_ok = self
            .branch_name
            .as_ref()
            .is_none_or(|b| movement.branch_name.as_ref() == Some(b));
        product_ok && branch_ok
    }

    pub fn filter<'a>(&'a self, movements: &'a [Movement]) -> impl Iterator<Item = &'a Movement> + 'a {
        movements.iter().filter(move |m| self.matches(m))
    }
}

/// One history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementView<'a> {
    pub movement: &'a Movement,
    pub operation: OperationType,
    pub signed_quantity: String,
    pub stock_after: i64,
}

/// Project movements newest first.
///
/// The sort is stable: entries sharing a `created_at` keep their input order.
pub fn project<'a>(movements: &'a [Movement], classifier: &Classifier) -> Vec<MovementView<'a>> {
    shape(movements.iter(), classifier)
}

/// [`project`] restricted to `scope`.
pub fn project_scoped<'a>(
    movements: &'a [Movement],
    scope: &LedgerScope,
    classifier: &Classifier,
) -> Vec<MovementView<'a>> {
    shape(movements.iter().filter(|m| scope.matches(m)), classifier)
}

fn shape<'a>(
    movements: impl Iterator<Item = &'a Movement>,
    classifier: &Classifier,
) -> Vec<MovementView<'a>> {
    let mut ordered: Vec<&Movement> = movements.collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ordered
        .into_iter()
        .map(|m| MovementView {
            movement: m,
            operation: classifier.classify(m),
            signed_quantity: format_signed_quantity(m),
            stock_after: stock_after_at_movement(m),
        })
        .collect()
}

/// `+q` for incoming, `-q` for outgoing, `±q` for adjustments.
///
/// `q` is the stored quantity, printed as-is.
pub fn format_signed_quantity(movement: &Movement) -> String {
    let sign = match movement.direction {
        Direction::In => "+",
        Direction::Out => "-",
        Direction::Adjustment => "±",
    };
    format!("{sign}{}", movement.quantity)
}

/// On-hand quantity recorded with this movement, verbatim.
pub fn stock_after_at_movement(movement: &Movement) -> i64 {
    movement.stock_after
}

/// Unit flow across a set of movements. Adjustments count toward
/// `movement_count` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementTotals {
    pub movement_count: usize,
    pub units_in: i64,
    pub units_out: i64,
}

pub fn totals<'a>(movements: impl IntoIterator<Item = &'a Movement>) -> MovementTotals {
    movements
        .into_iter()
        .fold(MovementTotals::default(), |mut acc, m| {
            acc.movement_count += 1;
            match m.direction {
                Direction::In => acc.units_in = acc.units_in.saturating_add(m.quantity),
                Direction::Out => acc.units_out = acc.units_out.saturating_add(m.quantity),
                Direction::Adjustment => {}
            }
            acc
        })
}
