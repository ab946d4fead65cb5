//! Stock availability engine.
//!
//! Sellable quantity of a simple product is its own on-hand quantity. For a
//! composite product it is the number of complete bundles that can be
//! assembled from its components' on-hand quantities.
//!
//! Composite nesting is one level deep: a component that is itself composite
//! contributes its literal `stock_qty`, it is not expanded further.

use serde::{Deserialize, Serialize};

use stockbook_core::ProductId;

use crate::catalog::Catalog;
use crate::product::Product;

/// Products at or below this many sellable units count as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 3;

/// Sellable quantity of `product` given the catalog snapshot.
///
/// Total over its inputs: unknown components, missing quantities and
/// degenerate recipes all degrade to 0, and the result is never negative.
pub fn available_stock(product: &Product, catalog: &Catalog) -> i64 {
    if !product.is_composite {
        return product.stock_qty.max(0);
    }

    // An empty recipe yields 0, never "unbounded".
    product
        .components
        .iter()
        .map(|c| producible_units(catalog.stock_of(&c.component_id), c.quantity_per_unit))
        .min()
        .unwrap_or(0)
        .max(0)
}

/// How many bundles a single recipe line could support on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentAvailability {
    pub component_id: ProductId,
    pub on_hand: i64,
    pub quantity_per_unit: i64,
    pub producible_units: i64,
}

/// Per-component breakdown for a composite product, in recipe order.
///
/// Empty for simple products.
pub fn component_breakdown(product: &Product, catalog: &Catalog) -> Vec<ComponentAvailability> {
    if !product.is_composite {
        return Vec::new();
    }
    product
        .components
        .iter()
        .map(|c| {
            let on_hand = catalog.stock_of(&c.component_id);
            ComponentAvailability {
                component_id: c.component_id,
                on_hand,
                quantity_per_unit: c.quantity_per_unit,
                producible_units: producible_units(on_hand, c.quantity_per_unit),
            }
        })
        .collect()
}

/// The component that caps a composite product's availability.
///
/// Ties resolve to the first such component in recipe order.
pub fn limiting_component(product: &Product, catalog: &Catalog) -> Option<ComponentAvailability> {
    component_breakdown(product, catalog)
        .into_iter()
        .reduce(|best, c| if c.producible_units < best.producible_units { c } else { best })
}

pub fn is_low_stock(product: &Product, catalog: &Catalog, threshold: i64) -> bool {
    available_stock(product, catalog) <= threshold
}

/// Coarse availability classification for dashboards and sale warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    InStock,
}

impl StockStatus {
    pub fn classify(available: i64, low_threshold: i64) -> Self {
        if available <= 0 {
            StockStatus::OutOfStock
        } else if available <= low_threshold {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    pub fn of(product: &Product, catalog: &Catalog, low_threshold: i64) -> Self {
        Self::classify(available_stock(product, catalog), low_threshold)
    }
}

/// Whole bundles one recipe line supports; 0 when `quantity_per_unit <= 0`.
pub fn producible_units(on_hand: i64, quantity_per_unit: i64) -> i64 {
    if quantity_per_unit <= 0 {
        return 0;
    }
    on_hand.div_euclid(quantity_per_unit)
}
