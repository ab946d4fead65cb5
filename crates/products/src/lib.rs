//! Product catalog and stock availability.
//!
//! This crate reads catalog snapshots and derives sellable quantities from
//! them, purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod availability;
pub mod catalog;
pub mod product;

pub use availability::{
    ComponentAvailability, DEFAULT_LOW_STOCK_THRESHOLD, StockStatus, available_stock,
    component_breakdown, is_low_stock, limiting_component, producible_units,
};
pub use catalog::{Catalog, CatalogProvider};
pub use product::{ComponentRecord, ComponentRequirement, Product, ProductRecord};
