//! Audit queries over recorded stock snapshots.
//!
//! These answer "which movement left the stock at this level" and "what did
//! the ledger say at time T" from recorded `stock_after` values. `reconcile`
//! compares the newest snapshot with the catalog's current figure and reports
//! drift; it never alters what history displays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{MovementId, ProductId};
use stockbook_products::{Catalog, Product};

use crate::movement::Movement;

/// Movements of `product_id` whose recorded `stock_after` equals `level`,
/// newest first.
pub fn movements_resulting_in(movements: &[Movement], product_id: ProductId, level: i64) -> Vec<&Movement> {
    let mut hits: Vec<&Movement> = movements
        .iter()
        .filter(|m| m.product_id == product_id && m.stock_after == level)
        .collect();
    hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    hits
}

/// Newest movement recorded for `product_id`.
///
/// Among entries sharing the newest timestamp, the last one in arrival order wins.
pub fn latest_movement(movements: &[Movement], product_id: ProductId) -> Option<&Movement> {
    movements
        .iter()
        .filter(|m| m.product_id == product_id)
        .max_by_key(|m| m.created_at)
}

/// Recorded on-hand quantity of `product_id` as of `at` (inclusive).
///
/// `None` when no movement for the product exists at or before `at`.
pub fn stock_as_of(movements: &[Movement], product_id: ProductId, at: DateTime<Utc>) -> Option<i64> {
    movements
        .iter()
        .filter(|m| m.product_id == product_id && m.created_at <= at)
        .max_by_key(|m| m.created_at)
        .map(|m| m.stock_after)
}

/// Disagreement between the newest recorded snapshot and the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDrift {
    pub product_id: ProductId,
    pub movement_id: MovementId,
    pub recorded: i64,
    pub current: i64,
}

impl SnapshotDrift {
    /// `current - recorded`.
    pub fn difference(&self) -> i64 {
        self.current - self.recorded
    }
}

/// Compare a simple product's `stock_qty` with its newest recorded snapshot.
///
/// Composite products carry no stock of their own and never drift. Products
/// without history have nothing to compare against.
pub fn reconcile(product: &Product, movements: &[Movement]) -> Option<SnapshotDrift> {
    if product.is_composite {
        return None;
    }
    let latest = latest_movement(movements, product.id)?;
    if latest.stock_after == product.stock_qty {
        return None;
    }
    Some(SnapshotDrift {
        product_id: product.id,
        movement_id: latest.id,
        recorded: latest.stock_after,
        current: product.stock_qty,
    })
}

/// [`reconcile`] across a whole catalog, in catalog order.
pub fn reconcile_catalog(catalog: &Catalog, movements: &[Movement]) -> Vec<SnapshotDrift> {
    let drifts: Vec<SnapshotDrift> = catalog.iter().filter_map(|p| reconcile(p, movements)).collect();
    if !drifts.is_empty() {
        tracing::debug!(count = drifts.len(), "stock snapshots diverge from catalog");
    }
    drifts
}
