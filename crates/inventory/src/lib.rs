//! Inventory ledger: movements, operation classification and projections.
//!
//! The ledger is append-only history written by an external store. This
//! crate never mutates it; it classifies, orders, scopes and audits
//! snapshots of it (no IO, no HTTP, no storage beyond the in-memory
//! reference store).

pub mod audit;
pub mod classifier;
pub mod ledger;
pub mod movement;
pub mod operation;
pub mod request;
pub mod store;

pub use audit::{SnapshotDrift, latest_movement, movements_resulting_in, reconcile, reconcile_catalog, stock_as_of};
pub use classifier::{Classifier, InventoryConfig, classify};
pub use ledger::{
    LedgerScope, MovementTotals, MovementView, format_signed_quantity, project, project_scoped,
    stock_after_at_movement, totals,
};
pub use movement::{Direction, Movement, MovementRecord};
pub use operation::{OperationMeta, OperationMetadataTable, OperationType};
pub use request::NewMovement;
pub use store::{InMemoryLedgerStore, LedgerStore};
