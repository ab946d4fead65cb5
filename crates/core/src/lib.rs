//! `stockbook-core` — shared building blocks for the inventory accounting core.
//!
//! This crate contains **pure domain** primitives (no storage, no transport).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BranchName, MovementId, ProductId, SaleId, StaffId};
pub use value_object::ValueObject;
